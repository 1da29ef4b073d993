//! Invoice database operations.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{money_from_sql, money_to_sql, DbError, DbResult, Store};
use crate::models::{Invoice, InvoiceStatus};

const COLUMNS: &str = "id, patient_id, test_ids, total_amount, status, payment_method, created_at";

/// Invoice collection.
pub struct InvoiceStore<'c> {
    conn: &'c Connection,
}

impl<'c> InvoiceStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Invoices for one patient, in insertion order.
    pub fn by_patient(&self, patient_id: &str) -> DbResult<Vec<Invoice>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM invoices WHERE patient_id = ? ORDER BY rowid",
            COLUMNS
        ))?;
        let rows = stmt.query_map([patient_id], InvoiceRow::from_row)?;

        let mut invoices = Vec::new();
        for row in rows {
            invoices.push(row?.try_into()?);
        }
        Ok(invoices)
    }

    /// Set payment status and method. Returns false if no such invoice.
    pub fn update_payment_status(
        &self,
        id: &str,
        status: InvoiceStatus,
        payment_method: Option<&str>,
    ) -> DbResult<bool> {
        let rows_affected = self.conn.execute(
            "UPDATE invoices SET status = ?2, payment_method = ?3 WHERE id = ?1",
            params![id, status.as_str(), payment_method],
        )?;
        tracing::debug!(id, status = %status, updated = rows_affected > 0, "payment status");
        Ok(rows_affected > 0)
    }
}

impl Store for InvoiceStore<'_> {
    type Record = Invoice;

    const TABLE: &'static str = "invoices";

    fn conn(&self) -> &Connection {
        self.conn
    }

    fn get_by_id(&self, id: &str) -> DbResult<Option<Invoice>> {
        let result = self
            .conn
            .query_row(
                &format!("SELECT {} FROM invoices WHERE id = ?", COLUMNS),
                [id],
                InvoiceRow::from_row,
            )
            .optional()?;

        result.map(|row| row.try_into()).transpose()
    }

    fn list(&self) -> DbResult<Vec<Invoice>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM invoices ORDER BY rowid", COLUMNS))?;
        let rows = stmt.query_map([], InvoiceRow::from_row)?;

        let mut invoices = Vec::new();
        for row in rows {
            invoices.push(row?.try_into()?);
        }
        Ok(invoices)
    }

    fn upsert(&self, invoice: &Invoice) -> DbResult<()> {
        let test_ids_json = serde_json::to_string(&invoice.test_ids)?;

        self.conn.execute(
            r#"
            INSERT INTO invoices (
                id, patient_id, test_ids, total_amount, status, payment_method, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(id) DO UPDATE SET
                patient_id = excluded.patient_id,
                test_ids = excluded.test_ids,
                total_amount = excluded.total_amount,
                status = excluded.status,
                payment_method = excluded.payment_method,
                created_at = excluded.created_at
            "#,
            params![
                invoice.id,
                invoice.patient_id,
                test_ids_json,
                money_to_sql(&invoice.total_amount),
                invoice.status.as_str(),
                invoice.payment_method,
                invoice.created_at,
            ],
        )?;
        tracing::debug!(id = %invoice.id, total = %invoice.total_amount, "invoice upserted");
        Ok(())
    }
}

/// Intermediate row struct for database mapping.
struct InvoiceRow {
    id: String,
    patient_id: String,
    test_ids: String,
    total_amount: String,
    status: String,
    payment_method: Option<String>,
    created_at: String,
}

impl InvoiceRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            test_ids: row.get(2)?,
            total_amount: row.get(3)?,
            status: row.get(4)?,
            payment_method: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = DbError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<InvoiceStatus>()
            .map_err(|message| DbError::InvalidValue {
                column: "invoices.status",
                message,
            })?;

        Ok(Invoice {
            total_amount: money_from_sql("invoices.total_amount", &row.total_amount)?,
            test_ids: serde_json::from_str(&row.test_ids)?,
            id: row.id,
            patient_id: row.patient_id,
            status,
            payment_method: row.payment_method,
            created_at: row.created_at,
        })
    }
}
