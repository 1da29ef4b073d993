//! Report database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{DbError, DbResult, Store};
use crate::models::Report;

const COLUMNS: &str = "id, patient_id, test_id, date, results, notes";

/// Report collection.
pub struct ReportStore<'c> {
    conn: &'c Connection,
}

impl<'c> ReportStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Reports for one patient, in insertion order.
    pub fn by_patient(&self, patient_id: &str) -> DbResult<Vec<Report>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM reports WHERE patient_id = ? ORDER BY rowid",
            COLUMNS
        ))?;
        let rows = stmt.query_map([patient_id], ReportRow::from_row)?;

        let mut reports = Vec::new();
        for row in rows {
            reports.push(row?.try_into()?);
        }
        Ok(reports)
    }
}

impl Store for ReportStore<'_> {
    type Record = Report;

    const TABLE: &'static str = "reports";

    fn conn(&self) -> &Connection {
        self.conn
    }

    fn get_by_id(&self, id: &str) -> DbResult<Option<Report>> {
        let result = self
            .conn
            .query_row(
                &format!("SELECT {} FROM reports WHERE id = ?", COLUMNS),
                [id],
                ReportRow::from_row,
            )
            .optional()?;

        result.map(|row| row.try_into()).transpose()
    }

    fn list(&self) -> DbResult<Vec<Report>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM reports ORDER BY rowid", COLUMNS))?;
        let rows = stmt.query_map([], ReportRow::from_row)?;

        let mut reports = Vec::new();
        for row in rows {
            reports.push(row?.try_into()?);
        }
        Ok(reports)
    }

    fn upsert(&self, report: &Report) -> DbResult<()> {
        let results_json = serde_json::to_string(&report.results)?;

        self.conn.execute(
            r#"
            INSERT INTO reports (id, patient_id, test_id, date, results, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                patient_id = excluded.patient_id,
                test_id = excluded.test_id,
                date = excluded.date,
                results = excluded.results,
                notes = excluded.notes
            "#,
            params![
                report.id,
                report.patient_id,
                report.test_id,
                report.date,
                results_json,
                report.notes,
            ],
        )?;
        tracing::debug!(id = %report.id, results = report.results.len(), "report upserted");
        Ok(())
    }
}

/// Intermediate row struct for database mapping.
struct ReportRow {
    id: String,
    patient_id: String,
    test_id: String,
    date: String,
    results: String,
    notes: Option<String>,
}

impl ReportRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            test_id: row.get(2)?,
            date: row.get(3)?,
            results: row.get(4)?,
            notes: row.get(5)?,
        })
    }
}

impl TryFrom<ReportRow> for Report {
    type Error = DbError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        Ok(Report {
            id: row.id,
            patient_id: row.patient_id,
            test_id: row.test_id,
            date: row.date,
            results: serde_json::from_str(&row.results)?,
            notes: row.notes,
        })
    }
}
