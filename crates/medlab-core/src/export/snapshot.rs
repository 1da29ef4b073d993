//! Versioned JSON snapshot of every collection.
//!
//! Import is validate-then-apply: the whole document is checked and decoded
//! before any store is touched, and the replacement then runs in a single
//! transaction, so a rejected or failed import leaves every store as it was.

use std::collections::HashSet;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::config;
use crate::db::{
    Database, DbError, DbResult, HospitalStore, InvoiceStore, PatientStore, ReportStore, Store,
    TestStore,
};
use crate::models::{HospitalDetailsPatch, Invoice, LabTest, Patient, Report};

/// Collections every snapshot must carry.
pub const REQUIRED_COLLECTIONS: [&str; 4] = ["patients", "tests", "reports", "invoices"];

/// Import errors. None of them leave partial changes behind.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Invalid data format: {0}")]
    Validation(String),

    #[error("Snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl From<rusqlite::Error> for ImportError {
    fn from(e: rusqlite::Error) -> Self {
        ImportError::Database(DbError::Sqlite(e))
    }
}

pub type ImportResult<T> = Result<T, ImportError>;

/// Point-in-time copy of all stores plus the hospital profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub patients: Vec<Patient>,
    pub tests: Vec<LabTest>,
    pub reports: Vec<Report>,
    pub invoices: Vec<Invoice>,
    /// Overlaid onto the current profile on import, when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hospital_details: Option<HospitalDetailsPatch>,
    /// ISO-8601 export time
    #[serde(default)]
    pub export_date: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// Counts of what an import applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub patients: usize,
    pub tests: usize,
    pub reports: usize,
    pub invoices: usize,
    pub hospital_details_merged: bool,
}

impl Snapshot {
    /// Read every store. Never mutates anything.
    pub fn capture(db: &Database) -> DbResult<Self> {
        Ok(Self {
            patients: db.patients().list()?,
            tests: db.tests().list()?,
            reports: db.reports().list()?,
            invoices: db.invoices().list()?,
            hospital_details: Some(db.hospital().get()?.into()),
            export_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            version: Some(config::SNAPSHOT_VERSION.to_string()),
        })
    }

    /// Export to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse and fully validate a snapshot document.
    ///
    /// Unknown top-level keys are ignored so newer minor versions still load.
    pub fn from_json(json: &str) -> ImportResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> ImportResult<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ImportError::Validation("snapshot must be a JSON object".into()))?;

        let missing: Vec<&str> = REQUIRED_COLLECTIONS
            .iter()
            .copied()
            .filter(|key| !object.get(*key).is_some_and(Value::is_array))
            .collect();
        if !missing.is_empty() {
            return Err(ImportError::Validation(format!(
                "Missing required data collections: {}",
                missing.join(", ")
            )));
        }

        if let Some(version) = object.get("version").filter(|v| !v.is_null()) {
            check_version(version)?;
        }

        let snapshot: Self = serde_json::from_value(value)
            .map_err(|e| ImportError::Validation(format!("invalid record: {}", e)))?;
        snapshot.check_unique_ids()?;
        Ok(snapshot)
    }

    /// Every collection must hold each id at most once.
    fn check_unique_ids(&self) -> ImportResult<()> {
        unique_ids("patients", self.patients.iter().map(|p| p.id.as_str()))?;
        unique_ids("tests", self.tests.iter().map(|t| t.id.as_str()))?;
        unique_ids("reports", self.reports.iter().map(|r| r.id.as_str()))?;
        unique_ids("invoices", self.invoices.iter().map(|i| i.id.as_str()))
    }

    /// Replace the four collections and merge the profile, all or nothing.
    ///
    /// Order: patients, tests, reports, invoices, then the profile.
    pub fn apply(&self, db: &mut Database) -> ImportResult<ImportSummary> {
        self.check_unique_ids()?;
        let tx = db.transaction()?;

        let patients = PatientStore::new(&tx);
        let tests = TestStore::new(&tx);
        let reports = ReportStore::new(&tx);
        let invoices = InvoiceStore::new(&tx);
        patients.replace_all(&self.patients)?;
        tests.replace_all(&self.tests)?;
        reports.replace_all(&self.reports)?;
        invoices.replace_all(&self.invoices)?;

        let hospital_details_merged = match &self.hospital_details {
            Some(patch) => {
                HospitalStore::new(&tx).merge(patch.clone())?;
                true
            }
            None => false,
        };

        let summary = ImportSummary {
            patients: patients.count()?,
            tests: tests.count()?,
            reports: reports.count()?,
            invoices: invoices.count()?,
            hospital_details_merged,
        };

        tx.commit()?;
        Ok(summary)
    }
}

fn unique_ids<'a>(collection: &str, ids: impl Iterator<Item = &'a str>) -> ImportResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(ImportError::Validation(format!(
                "duplicate id {} in {}",
                id, collection
            )));
        }
    }
    Ok(())
}

fn check_version(version: &Value) -> ImportResult<()> {
    let text = version
        .as_str()
        .ok_or_else(|| ImportError::Validation("version must be a string".into()))?;

    let major = text
        .split('.')
        .next()
        .and_then(|m| m.parse::<u64>().ok())
        .ok_or_else(|| ImportError::Validation(format!("unreadable version: {}", text)))?;

    if major != config::SNAPSHOT_MAJOR {
        return Err(ImportError::Validation(format!(
            "unsupported snapshot version {} (expected {}.x)",
            text,
            config::SNAPSHOT_MAJOR
        )));
    }
    Ok(())
}

/// Capture every store as a snapshot.
pub fn export_snapshot(db: &Database) -> DbResult<Snapshot> {
    let snapshot = Snapshot::capture(db)?;
    tracing::info!(
        patients = snapshot.patients.len(),
        tests = snapshot.tests.len(),
        reports = snapshot.reports.len(),
        invoices = snapshot.invoices.len(),
        "snapshot exported"
    );
    Ok(snapshot)
}

/// Validate a snapshot document, then apply it.
pub fn import_snapshot(db: &mut Database, json: &str) -> ImportResult<ImportSummary> {
    let snapshot = match Snapshot::from_json(json) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(error = %e, "snapshot rejected");
            return Err(e);
        }
    };

    let summary = snapshot.apply(db)?;
    tracing::info!(
        patients = summary.patients,
        tests = summary.tests,
        reports = summary.reports,
        invoices = summary.invoices,
        hospital_details = summary.hospital_details_merged,
        "snapshot imported"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;

    fn seeded_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        let mut patient = Patient::new("Meera Nair", 52, "Female");
        patient.id = "p1".into();
        let mut test = LabTest::new("CBC", "Hematology", Decimal::new(30000, 2));
        test.id = "t1".into();
        let mut invoice = Invoice::new("p1", vec!["t1".into()], Decimal::new(30000, 2));
        invoice.id = "i1".into();

        db.patients().upsert(&patient).unwrap();
        db.tests().upsert(&test).unwrap();
        db.invoices().upsert(&invoice).unwrap();
        db
    }

    #[test]
    fn test_duplicate_ids_are_rejected_before_apply() {
        let mut db = seeded_db();
        let snapshot = json!({
            "patients": [
                { "id": "p1", "name": "A", "age": 30, "gender": "Male" },
                { "id": "p1", "name": "B", "age": 31, "gender": "Female" }
            ],
            "tests": [],
            "reports": [],
            "invoices": []
        });

        let err = import_snapshot(&mut db, &snapshot.to_string()).unwrap_err();
        assert!(matches!(err, ImportError::Validation(ref m) if m.contains("duplicate id p1")));
        assert_eq!(db.patients().get_by_id("p1").unwrap().unwrap().name, "Meera Nair");
        assert_eq!(db.counts().unwrap().invoices, 1);
    }

    #[test]
    fn test_summary_counts_what_was_stored() {
        let mut db = seeded_db();
        let snapshot = json!({
            "patients": [
                { "id": "p1", "name": "A", "age": 30, "gender": "Male" },
                { "id": "p2", "name": "B", "age": 31, "gender": "Female" }
            ],
            "tests": [],
            "reports": [],
            "invoices": []
        });

        let summary = import_snapshot(&mut db, &snapshot.to_string()).unwrap();
        assert_eq!(summary.patients, 2);
        assert_eq!(summary.tests, 0);
        assert_eq!(summary.patients, db.counts().unwrap().patients);
    }

    #[test]
    fn test_capture_carries_version_and_profile() {
        let db = seeded_db();
        let snapshot = export_snapshot(&db).unwrap();

        assert_eq!(snapshot.version.as_deref(), Some("1.0.0"));
        assert!(snapshot.export_date.ends_with('Z'));
        assert_eq!(snapshot.patients.len(), 1);
        assert_eq!(
            snapshot.hospital_details.unwrap().name.as_deref(),
            Some("MedLab Diagnostics")
        );
    }

    #[test]
    fn test_json_keys() {
        let db = seeded_db();
        let json = export_snapshot(&db).unwrap().to_json().unwrap();
        let value: Value = serde_json::from_str(&json).unwrap();

        for key in ["patients", "tests", "reports", "invoices", "hospitalDetails", "exportDate", "version"] {
            assert!(value.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(value["invoices"][0]["tests"], json!(["t1"]));
        assert_eq!(value["invoices"][0]["totalAmount"], json!(300.0));
    }

    #[test]
    fn test_missing_collection_rejected() {
        let err = Snapshot::from_value(json!({
            "patients": [], "tests": [], "reports": []
        }))
        .unwrap_err();

        match err {
            ImportError::Validation(msg) => assert!(msg.contains("invoices")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_non_array_collection_rejected() {
        let result = Snapshot::from_value(json!({
            "patients": {}, "tests": [], "reports": [], "invoices": []
        }));
        assert!(matches!(result, Err(ImportError::Validation(_))));
    }

    #[test]
    fn test_bad_record_rejected() {
        let result = Snapshot::from_value(json!({
            "patients": [{"id": "p1"}], "tests": [], "reports": [], "invoices": []
        }));
        assert!(matches!(result, Err(ImportError::Validation(_))));
    }

    #[test]
    fn test_version_policy() {
        let base = |version: Value| {
            json!({
                "patients": [], "tests": [], "reports": [], "invoices": [],
                "version": version, "futureKey": {"x": 1}
            })
        };

        assert!(Snapshot::from_value(base(json!("1.4.0"))).is_ok());
        assert!(Snapshot::from_value(base(Value::Null)).is_ok());
        assert!(matches!(
            Snapshot::from_value(base(json!("2.0.0"))),
            Err(ImportError::Validation(_))
        ));
        assert!(matches!(
            Snapshot::from_value(base(json!(1))),
            Err(ImportError::Validation(_))
        ));
    }

    #[test]
    fn test_not_json() {
        let mut db = seeded_db();
        assert!(matches!(
            import_snapshot(&mut db, "{not json"),
            Err(ImportError::Json(_))
        ));
        assert_eq!(db.counts().unwrap().patients, 1);
    }

    #[test]
    fn test_import_replaces_and_merges_profile() {
        let mut db = seeded_db();
        let json = json!({
            "patients": [{"id": "p9", "name": "New", "age": 9, "gender": "Male"}],
            "tests": [],
            "reports": [],
            "invoices": [],
            "hospitalDetails": {"name": "Imported Lab"}
        })
        .to_string();

        let summary = import_snapshot(&mut db, &json).unwrap();
        assert_eq!(summary.patients, 1);
        assert!(summary.hospital_details_merged);

        let patients = db.patients().list().unwrap();
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].id, "p9");
        assert_eq!(db.counts().unwrap().invoices, 0);

        let profile = db.hospital().get().unwrap();
        assert_eq!(profile.name, "Imported Lab");
        assert_eq!(profile.phone, "+1 (555) 123-4567");
    }

    #[test]
    fn test_import_without_profile_keeps_profile() {
        let mut db = seeded_db();
        db.hospital()
            .merge(HospitalDetailsPatch {
                name: Some("Kept Lab".into()),
                ..Default::default()
            })
            .unwrap();

        let json = r#"{"patients":[],"tests":[],"reports":[],"invoices":[]}"#;
        let summary = import_snapshot(&mut db, json).unwrap();
        assert!(!summary.hospital_details_merged);
        assert_eq!(db.hospital().get().unwrap().name, "Kept Lab");
    }
}
