//! Patient database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{DbResult, Store};
use crate::models::Patient;

const COLUMNS: &str = "id, name, age, gender, phone, email, address, created_at";

/// Patient collection.
pub struct PatientStore<'c> {
    conn: &'c Connection,
}

impl<'c> PatientStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Search patients by name (case-insensitive prefix match).
    pub fn search(&self, query: &str, limit: usize) -> DbResult<Vec<Patient>> {
        let pattern = format!("{}%", escape_like(query));
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM patients WHERE name LIKE ? ESCAPE '\\' ORDER BY name LIMIT ?",
            COLUMNS
        ))?;

        let rows = stmt.query_map(params![pattern, limit as i64], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

/// Make `%`, `_` and `\` match literally in a LIKE pattern.
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl Store for PatientStore<'_> {
    type Record = Patient;

    const TABLE: &'static str = "patients";

    fn conn(&self) -> &Connection {
        self.conn
    }

    fn get_by_id(&self, id: &str) -> DbResult<Option<Patient>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM patients WHERE id = ?", COLUMNS),
                [id],
                patient_from_row,
            )
            .optional()
            .map_err(Into::into)
    }

    fn list(&self) -> DbResult<Vec<Patient>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM patients ORDER BY rowid", COLUMNS))?;
        let rows = stmt.query_map([], patient_from_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn upsert(&self, patient: &Patient) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO patients (
                id, name, age, gender, phone, email, address, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                age = excluded.age,
                gender = excluded.gender,
                phone = excluded.phone,
                email = excluded.email,
                address = excluded.address,
                created_at = excluded.created_at
            "#,
            params![
                patient.id,
                patient.name,
                patient.age,
                patient.gender,
                patient.phone,
                patient.email,
                patient.address,
                patient.created_at,
            ],
        )?;
        tracing::debug!(id = %patient.id, "patient upserted");
        Ok(())
    }
}

fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: row.get(0)?,
        name: row.get(1)?,
        age: row.get(2)?,
        gender: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        address: row.get(6)?,
        created_at: row.get(7)?,
    })
}
