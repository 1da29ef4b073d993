//! Database layer for medlab.
//!
//! Each collection is owned by a typed store handle borrowed from
//! [`Database`]. Handles can also be built over an open transaction, which
//! is how snapshot import applies several collections atomically.

mod schema;
mod hospital;
mod invoices;
mod patients;
mod reports;

pub use schema::*;
pub use hospital::*;
pub use invoices::*;
pub use lab_tests::*;
pub use patients::*;
pub use reports::*;

use rusqlite::Connection;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid stored value in {column}: {message}")]
    InvalidValue { column: &'static str, message: String },
}

pub type DbResult<T> = Result<T, DbError>;

/// Read/write interface shared by every record collection.
///
/// Lists come back in insertion order; `upsert` of an existing id keeps the
/// record's position.
pub trait Store {
    type Record;

    /// Backing table name.
    const TABLE: &'static str;

    /// Connection (or open transaction) the store works on.
    fn conn(&self) -> &Connection;

    /// Get a record by ID.
    fn get_by_id(&self, id: &str) -> DbResult<Option<Self::Record>>;

    /// List all records in insertion order.
    fn list(&self) -> DbResult<Vec<Self::Record>>;

    /// Insert a record, or replace the one with the same ID.
    fn upsert(&self, record: &Self::Record) -> DbResult<()>;

    /// Delete a record. Returns false if no such ID.
    fn remove(&self, id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn()
            .execute(&format!("DELETE FROM {} WHERE id = ?", Self::TABLE), [id])?;
        tracing::debug!(table = Self::TABLE, id, removed = rows_affected > 0, "remove");
        Ok(rows_affected > 0)
    }

    /// Replace the whole collection.
    ///
    /// Runs in its own transaction unless the caller already holds one, in
    /// which case the caller's commit decides.
    fn replace_all(&self, records: &[Self::Record]) -> DbResult<()> {
        let conn = self.conn();
        let tx = if conn.is_autocommit() {
            Some(conn.unchecked_transaction()?)
        } else {
            None
        };

        conn.execute(&format!("DELETE FROM {}", Self::TABLE), [])?;
        for record in records {
            self.upsert(record)?;
        }

        if let Some(tx) = tx {
            tx.commit()?;
        }
        tracing::debug!(table = Self::TABLE, count = records.len(), "replace_all");
        Ok(())
    }

    /// Number of stored records.
    fn count(&self) -> DbResult<usize> {
        let count: i64 = self.conn().query_row(
            &format!("SELECT COUNT(*) FROM {}", Self::TABLE),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

/// Record counts per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreCounts {
    pub patients: usize,
    pub tests: usize,
    pub reports: usize,
    pub invoices: usize,
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        let counts = db.counts()?;
        tracing::info!(
            patients = counts.patients,
            tests = counts.tests,
            reports = counts.reports,
            invoices = counts.invoices,
            "database opened"
        );
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction.
    pub fn transaction(&mut self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }

    pub fn patients(&self) -> PatientStore<'_> {
        PatientStore::new(&self.conn)
    }

    pub fn tests(&self) -> TestStore<'_> {
        TestStore::new(&self.conn)
    }

    pub fn reports(&self) -> ReportStore<'_> {
        ReportStore::new(&self.conn)
    }

    pub fn invoices(&self) -> InvoiceStore<'_> {
        InvoiceStore::new(&self.conn)
    }

    pub fn hospital(&self) -> HospitalStore<'_> {
        HospitalStore::new(&self.conn)
    }

    /// Count records in every collection.
    pub fn counts(&self) -> DbResult<StoreCounts> {
        Ok(StoreCounts {
            patients: self.patients().count()?,
            tests: self.tests().count()?,
            reports: self.reports().count()?,
            invoices: self.invoices().count()?,
        })
    }
}

/// Parse a decimal column written by [`money_to_sql`].
pub(crate) fn money_from_sql(
    column: &'static str,
    value: &str,
) -> DbResult<rust_decimal::Decimal> {
    value.parse().map_err(|e: rust_decimal::Error| DbError::InvalidValue {
        column,
        message: e.to_string(),
    })
}

/// Render a money value for storage, rounded half away from zero to two
/// fractional digits like the printed documents.
pub(crate) fn money_to_sql(value: &rust_decimal::Decimal) -> String {
    let rounded =
        value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded)
}
