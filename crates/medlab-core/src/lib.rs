//! MedLab Core Library
//!
//! Local-first record keeping for a diagnostic laboratory: patients, the
//! test catalog, lab reports and invoices, plus printable documents.
//!
//! # Architecture
//!
//! ```text
//!   Mobile/Web shell (UniFFI)
//!            │
//!            ▼
//!   ┌─────────────────┐     ┌──────────────┐     ┌──────────────────┐
//!   │  Entity Stores  │ ──▶ │  Aggregator  │ ──▶ │ DocumentGenerator│ ──▶ Presenter
//!   │ (SQLite tables) │     │ (Lookup<T>)  │     │  (HTML / text)   │    (print/share)
//!   └────────┬────────┘     └──────────────┘     └──────────────────┘
//!            │
//!            ▼
//!      Snapshot export/import (validate, then apply in one transaction)
//! ```
//!
//! # Core Principle
//!
//! **References never fail a render.** A patient or test that cannot be
//! found becomes a [`aggregate::Lookup::NotFound`] and prints as a
//! placeholder; stored invoice totals are never rewritten from live prices.
//!
//! # Modules
//!
//! - [`db`]: SQLite store layer
//! - [`models`]: Domain types (Patient, LabTest, Report, Invoice, HospitalDetails)
//! - [`aggregate`]: Cross-store resolution into views
//! - [`document`]: Printable report and invoice generation
//! - [`export`]: Snapshot export and import
//! - [`presentation`]: Platform print/share hook

pub mod aggregate;
pub mod config;
pub mod db;
pub mod document;
pub mod export;
pub mod logging;
pub mod models;
pub mod presentation;

// Re-export commonly used types
pub use aggregate::{Aggregator, EntityKind, InvoiceView, Lookup, ReportView};
pub use db::{Database, Store};
pub use document::{
    Document, DocumentGenerator, DocumentKind, InvoiceTotals, InvoiceViewModel, RenderOptions,
    ReportViewModel, ViewModel,
};
pub use export::{export_snapshot, import_snapshot, ImportSummary, Snapshot};
pub use models::{
    HospitalDetails, HospitalDetailsPatch, Invoice, InvoiceStatus, LabTest, Patient, Report,
    TestResult,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MedlabError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<db::DbError> for MedlabError {
    fn from(e: db::DbError) -> Self {
        MedlabError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for MedlabError {
    fn from(e: serde_json::Error) -> Self {
        MedlabError::SerializationError(e.to_string())
    }
}

impl From<aggregate::AggregateError> for MedlabError {
    fn from(e: aggregate::AggregateError) -> Self {
        match e {
            aggregate::AggregateError::InvalidInput(msg) => MedlabError::InvalidInput(msg),
            aggregate::AggregateError::Database(e) => e.into(),
        }
    }
}

impl From<export::ImportError> for MedlabError {
    fn from(e: export::ImportError) -> Self {
        match e {
            export::ImportError::Database(e) => e.into(),
            other => MedlabError::ValidationError(other.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for MedlabError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MedlabError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create a database at the given path.
#[uniffi::export]
pub fn open_database(path: String) -> Result<Arc<MedlabCore>, MedlabError> {
    let db = Database::open(&path)?;
    Ok(Arc::new(MedlabCore::new(db)))
}

/// Create an in-memory database (for testing).
#[uniffi::export]
pub fn open_database_in_memory() -> Result<Arc<MedlabCore>, MedlabError> {
    let db = Database::open_in_memory()?;
    Ok(Arc::new(MedlabCore::new(db)))
}

/// Install the tracing subscriber.
#[uniffi::export]
pub fn init_logging() {
    logging::init_logging();
}

/// Suggested file name for an export made today.
#[uniffi::export]
pub fn export_file_name() -> String {
    config::export_file_name(chrono::Local::now().date_naive())
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe database wrapper for FFI.
#[derive(uniffi::Object)]
pub struct MedlabCore {
    db: Arc<Mutex<Database>>,
    generator: DocumentGenerator,
}

impl MedlabCore {
    fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            generator: DocumentGenerator::default(),
        }
    }

    fn invoice_view_model(&self, db: &Database, id: &str) -> Result<ViewModel, MedlabError> {
        let view = Aggregator::new(db)
            .invoice(id)?
            .found()
            .ok_or_else(|| MedlabError::NotFound(format!("invoice {}", id)))?;
        let hospital = db.hospital().get()?;
        Ok(ViewModel::Invoice(InvoiceViewModel::from_view(&view, &hospital)))
    }

    fn report_view_model(&self, db: &Database, id: &str) -> Result<ViewModel, MedlabError> {
        let view = Aggregator::new(db)
            .report(id)?
            .found()
            .ok_or_else(|| MedlabError::NotFound(format!("report {}", id)))?;
        let hospital = db.hospital().get()?;
        Ok(ViewModel::Report(ReportViewModel::from_view(&view, &hospital)))
    }

    fn present(&self, vm: &ViewModel, output_dir: Option<String>) -> FfiPrintOutcome {
        let document = self.generator.generate(vm);
        let outcome = match output_dir {
            Some(dir) => {
                let presenter = presentation::HtmlFilePresenter::new(dir);
                presentation::print_document(&presenter, &document)
            }
            None => presentation::print_document(&presentation::UnsupportedPlatform, &document),
        };
        outcome.into()
    }
}

#[uniffi::export]
impl MedlabCore {
    // =========================================================================
    // Patient Operations
    // =========================================================================

    /// Register a new patient.
    pub fn create_patient(
        &self,
        name: String,
        age: u32,
        gender: String,
    ) -> Result<FfiPatient, MedlabError> {
        let db = self.db.lock()?;
        let patient = Patient::new(name, age, gender);
        db.patients().upsert(&patient)?;
        Ok(patient.into())
    }

    /// Add or update a patient.
    pub fn upsert_patient(&self, patient: FfiPatient) -> Result<(), MedlabError> {
        let db = self.db.lock()?;
        db.patients().upsert(&Patient::from(patient))?;
        Ok(())
    }

    pub fn get_patient(&self, id: String) -> Result<Option<FfiPatient>, MedlabError> {
        let db = self.db.lock()?;
        Ok(db.patients().get_by_id(&id)?.map(Into::into))
    }

    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, MedlabError> {
        let db = self.db.lock()?;
        Ok(db.patients().list()?.into_iter().map(Into::into).collect())
    }

    /// Search patients by name prefix.
    pub fn search_patients(
        &self,
        query: String,
        limit: u32,
    ) -> Result<Vec<FfiPatient>, MedlabError> {
        let db = self.db.lock()?;
        let patients = db.patients().search(&query, limit as usize)?;
        Ok(patients.into_iter().map(Into::into).collect())
    }

    /// Delete a patient. Reports and invoices referring to it are kept.
    pub fn delete_patient(&self, id: String) -> Result<bool, MedlabError> {
        let db = self.db.lock()?;
        Ok(db.patients().remove(&id)?)
    }

    // =========================================================================
    // Test Catalog Operations
    // =========================================================================

    pub fn upsert_test(&self, test: FfiLabTest) -> Result<(), MedlabError> {
        let db = self.db.lock()?;
        db.tests().upsert(&LabTest::try_from(test)?)?;
        Ok(())
    }

    pub fn get_test(&self, id: String) -> Result<Option<FfiLabTest>, MedlabError> {
        let db = self.db.lock()?;
        Ok(db.tests().get_by_id(&id)?.map(Into::into))
    }

    pub fn list_tests(&self) -> Result<Vec<FfiLabTest>, MedlabError> {
        let db = self.db.lock()?;
        Ok(db.tests().list()?.into_iter().map(Into::into).collect())
    }

    pub fn test_categories(&self) -> Result<Vec<String>, MedlabError> {
        let db = self.db.lock()?;
        Ok(db.tests().categories()?)
    }

    pub fn delete_test(&self, id: String) -> Result<bool, MedlabError> {
        let db = self.db.lock()?;
        Ok(db.tests().remove(&id)?)
    }

    // =========================================================================
    // Report Operations
    // =========================================================================

    pub fn upsert_report(&self, report: FfiReport) -> Result<(), MedlabError> {
        let db = self.db.lock()?;
        db.reports().upsert(&Report::from(report))?;
        Ok(())
    }

    pub fn get_report(&self, id: String) -> Result<Option<FfiReport>, MedlabError> {
        let db = self.db.lock()?;
        Ok(db.reports().get_by_id(&id)?.map(Into::into))
    }

    pub fn list_reports(&self) -> Result<Vec<FfiReport>, MedlabError> {
        let db = self.db.lock()?;
        Ok(db.reports().list()?.into_iter().map(Into::into).collect())
    }

    pub fn reports_for_patient(&self, patient_id: String) -> Result<Vec<FfiReport>, MedlabError> {
        let db = self.db.lock()?;
        let reports = db.reports().by_patient(&patient_id)?;
        Ok(reports.into_iter().map(Into::into).collect())
    }

    pub fn delete_report(&self, id: String) -> Result<bool, MedlabError> {
        let db = self.db.lock()?;
        Ok(db.reports().remove(&id)?)
    }

    // =========================================================================
    // Invoice Operations
    // =========================================================================

    pub fn upsert_invoice(&self, invoice: FfiInvoice) -> Result<(), MedlabError> {
        let db = self.db.lock()?;
        db.invoices().upsert(&Invoice::try_from(invoice)?)?;
        Ok(())
    }

    pub fn get_invoice(&self, id: String) -> Result<Option<FfiInvoice>, MedlabError> {
        let db = self.db.lock()?;
        Ok(db.invoices().get_by_id(&id)?.map(Into::into))
    }

    pub fn list_invoices(&self) -> Result<Vec<FfiInvoice>, MedlabError> {
        let db = self.db.lock()?;
        Ok(db.invoices().list()?.into_iter().map(Into::into).collect())
    }

    pub fn invoices_for_patient(&self, patient_id: String) -> Result<Vec<FfiInvoice>, MedlabError> {
        let db = self.db.lock()?;
        let invoices = db.invoices().by_patient(&patient_id)?;
        Ok(invoices.into_iter().map(Into::into).collect())
    }

    /// Record payment of an invoice.
    pub fn mark_invoice_paid(&self, id: String, payment_method: String) -> Result<(), MedlabError> {
        let db = self.db.lock()?;
        let updated =
            db.invoices()
                .update_payment_status(&id, InvoiceStatus::Paid, Some(&payment_method))?;
        if !updated {
            return Err(MedlabError::NotFound(format!("invoice {}", id)));
        }
        Ok(())
    }

    pub fn delete_invoice(&self, id: String) -> Result<bool, MedlabError> {
        let db = self.db.lock()?;
        Ok(db.invoices().remove(&id)?)
    }

    // =========================================================================
    // Hospital Profile Operations
    // =========================================================================

    pub fn get_hospital_details(&self) -> Result<FfiHospitalDetails, MedlabError> {
        let db = self.db.lock()?;
        Ok(db.hospital().get()?.into())
    }

    /// Overlay the given fields onto the profile; `None` fields are kept.
    pub fn update_hospital_details(
        &self,
        patch: FfiHospitalDetailsPatch,
    ) -> Result<FfiHospitalDetails, MedlabError> {
        let db = self.db.lock()?;
        Ok(db.hospital().merge(patch.into())?.into())
    }

    pub fn reset_hospital_details(&self) -> Result<FfiHospitalDetails, MedlabError> {
        let db = self.db.lock()?;
        Ok(db.hospital().reset()?.into())
    }

    // =========================================================================
    // Document Operations
    // =========================================================================

    /// Printable HTML for an invoice.
    pub fn invoice_document_html(&self, id: String) -> Result<String, MedlabError> {
        let db = self.db.lock()?;
        let vm = self.invoice_view_model(&db, &id)?;
        Ok(self.generator.generate(&vm).html)
    }

    /// Printable HTML for a report.
    pub fn report_document_html(&self, id: String) -> Result<String, MedlabError> {
        let db = self.db.lock()?;
        let vm = self.report_view_model(&db, &id)?;
        Ok(self.generator.generate(&vm).html)
    }

    pub fn invoice_share_text(&self, id: String) -> Result<String, MedlabError> {
        let db = self.db.lock()?;
        let vm = self.invoice_view_model(&db, &id)?;
        Ok(self.generator.share_text(&vm))
    }

    pub fn report_share_text(&self, id: String) -> Result<String, MedlabError> {
        let db = self.db.lock()?;
        let vm = self.report_view_model(&db, &id)?;
        Ok(self.generator.share_text(&vm))
    }

    /// Hand an invoice to the presenter. With no output directory the host
    /// has no print support and a failed outcome comes back.
    pub fn print_invoice(
        &self,
        id: String,
        output_dir: Option<String>,
    ) -> Result<FfiPrintOutcome, MedlabError> {
        let db = self.db.lock()?;
        let vm = self.invoice_view_model(&db, &id)?;
        Ok(self.present(&vm, output_dir))
    }

    pub fn print_report(
        &self,
        id: String,
        output_dir: Option<String>,
    ) -> Result<FfiPrintOutcome, MedlabError> {
        let db = self.db.lock()?;
        let vm = self.report_view_model(&db, &id)?;
        Ok(self.present(&vm, output_dir))
    }

    // =========================================================================
    // Export Operations
    // =========================================================================

    /// Export every store as snapshot JSON.
    pub fn export_snapshot_json(&self) -> Result<String, MedlabError> {
        let db = self.db.lock()?;
        let snapshot = export::export_snapshot(&db)?;
        Ok(snapshot.to_json()?)
    }

    /// Replace all stores from snapshot JSON. Nothing changes on error.
    pub fn import_snapshot_json(&self, json: String) -> Result<FfiImportSummary, MedlabError> {
        let mut db = self.db.lock()?;
        let summary = export::import_snapshot(&mut db, &json)?;
        Ok(summary.into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

fn parse_money(field: &str, value: &str) -> Result<Decimal, MedlabError> {
    value
        .trim()
        .parse::<Decimal>()
        .map_err(|e| MedlabError::InvalidInput(format!("{}: {}", field, e)))
}

fn format_money(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// FFI-safe patient.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub created_at: String,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            age: patient.age,
            gender: patient.gender,
            phone: patient.phone,
            email: patient.email,
            address: patient.address,
            created_at: patient.created_at,
        }
    }
}

impl From<FfiPatient> for Patient {
    fn from(patient: FfiPatient) -> Self {
        Patient {
            id: patient.id,
            name: patient.name,
            age: patient.age,
            gender: patient.gender,
            phone: patient.phone,
            email: patient.email,
            address: patient.address,
            created_at: patient.created_at,
        }
    }
}

/// FFI-safe catalog test. Price is a decimal string ("300.00").
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiLabTest {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: String,
    pub description: Option<String>,
}

impl From<LabTest> for FfiLabTest {
    fn from(test: LabTest) -> Self {
        Self {
            id: test.id,
            name: test.name,
            category: test.category,
            price: format_money(test.price),
            description: test.description,
        }
    }
}

impl TryFrom<FfiLabTest> for LabTest {
    type Error = MedlabError;

    fn try_from(test: FfiLabTest) -> Result<Self, Self::Error> {
        Ok(LabTest {
            price: parse_money("price", &test.price)?,
            id: test.id,
            name: test.name,
            category: test.category,
            description: test.description,
        })
    }
}

/// FFI-safe result row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTestResult {
    pub parameter_name: String,
    pub value: String,
    pub normal_range: String,
    pub unit: String,
    pub is_normal: bool,
}

/// FFI-safe report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReport {
    pub id: String,
    pub patient_id: String,
    pub test_id: String,
    pub date: String,
    pub results: Vec<FfiTestResult>,
    pub notes: Option<String>,
}

impl From<Report> for FfiReport {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            patient_id: report.patient_id,
            test_id: report.test_id,
            date: report.date,
            results: report
                .results
                .into_iter()
                .map(|r| FfiTestResult {
                    parameter_name: r.parameter_name,
                    value: r.value,
                    normal_range: r.normal_range,
                    unit: r.unit,
                    is_normal: r.is_normal,
                })
                .collect(),
            notes: report.notes,
        }
    }
}

impl From<FfiReport> for Report {
    fn from(report: FfiReport) -> Self {
        Report {
            id: report.id,
            patient_id: report.patient_id,
            test_id: report.test_id,
            date: report.date,
            results: report
                .results
                .into_iter()
                .map(|r| TestResult {
                    parameter_name: r.parameter_name,
                    value: r.value,
                    normal_range: r.normal_range,
                    unit: r.unit,
                    is_normal: r.is_normal,
                })
                .collect(),
            notes: report.notes,
        }
    }
}

/// FFI-safe invoice. Amount is a decimal string, status one of
/// "Pending", "Paid", "Due".
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiInvoice {
    pub id: String,
    pub patient_id: String,
    pub test_ids: Vec<String>,
    pub total_amount: String,
    pub status: String,
    pub payment_method: Option<String>,
    pub created_at: String,
}

impl From<Invoice> for FfiInvoice {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id,
            patient_id: invoice.patient_id,
            test_ids: invoice.test_ids,
            total_amount: format_money(invoice.total_amount),
            status: invoice.status.to_string(),
            payment_method: invoice.payment_method,
            created_at: invoice.created_at,
        }
    }
}

impl TryFrom<FfiInvoice> for Invoice {
    type Error = MedlabError;

    fn try_from(invoice: FfiInvoice) -> Result<Self, Self::Error> {
        Ok(Invoice {
            total_amount: parse_money("total_amount", &invoice.total_amount)?,
            status: invoice
                .status
                .parse()
                .map_err(MedlabError::InvalidInput)?,
            id: invoice.id,
            patient_id: invoice.patient_id,
            test_ids: invoice.test_ids,
            payment_method: invoice.payment_method,
            created_at: invoice.created_at,
        })
    }
}

/// FFI-safe hospital profile.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHospitalDetails {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub registration_number: Option<String>,
    pub tax_id: Option<String>,
    pub logo: Option<String>,
    pub footer: Option<String>,
    pub bank_details: Option<String>,
}

impl From<HospitalDetails> for FfiHospitalDetails {
    fn from(details: HospitalDetails) -> Self {
        Self {
            name: details.name,
            address: details.address,
            phone: details.phone,
            email: details.email,
            website: details.website,
            registration_number: details.registration_number,
            tax_id: details.tax_id,
            logo: details.logo,
            footer: details.footer,
            bank_details: details.bank_details,
        }
    }
}

/// FFI-safe partial profile update.
#[derive(Debug, Clone, Default, uniffi::Record)]
pub struct FfiHospitalDetailsPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub registration_number: Option<String>,
    pub tax_id: Option<String>,
    pub logo: Option<String>,
    pub footer: Option<String>,
    pub bank_details: Option<String>,
}

impl From<FfiHospitalDetailsPatch> for HospitalDetailsPatch {
    fn from(patch: FfiHospitalDetailsPatch) -> Self {
        HospitalDetailsPatch {
            name: patch.name,
            address: patch.address,
            phone: patch.phone,
            email: patch.email,
            website: patch.website,
            registration_number: patch.registration_number,
            tax_id: patch.tax_id,
            logo: patch.logo,
            footer: patch.footer,
            bank_details: patch.bank_details,
        }
    }
}

/// FFI-safe print result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPrintOutcome {
    pub success: bool,
    pub message: String,
}

impl From<presentation::PrintOutcome> for FfiPrintOutcome {
    fn from(outcome: presentation::PrintOutcome) -> Self {
        Self {
            success: outcome.success,
            message: outcome.message,
        }
    }
}

/// FFI-safe import summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiImportSummary {
    pub patients: u32,
    pub tests: u32,
    pub reports: u32,
    pub invoices: u32,
    pub hospital_details_merged: bool,
}

impl From<ImportSummary> for FfiImportSummary {
    fn from(summary: ImportSummary) -> Self {
        Self {
            patients: summary.patients as u32,
            tests: summary.tests as u32,
            reports: summary.reports as u32,
            invoices: summary.invoices as u32,
            hospital_details_merged: summary.hospital_details_merged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffi_invoice_round_trip() {
        let core = open_database_in_memory().unwrap();
        let patient = core
            .create_patient("Meera Nair".into(), 52, "Female".into())
            .unwrap();

        core.upsert_test(FfiLabTest {
            id: "t1".into(),
            name: "CBC".into(),
            category: "Hematology".into(),
            price: "300".into(),
            description: None,
        })
        .unwrap();

        core.upsert_invoice(FfiInvoice {
            id: "i1".into(),
            patient_id: patient.id.clone(),
            test_ids: vec!["t1".into(), "ghost".into()],
            total_amount: "300.00".into(),
            status: "Pending".into(),
            payment_method: None,
            created_at: "2024-03-05T10:15:00Z".into(),
        })
        .unwrap();

        core.mark_invoice_paid("i1".into(), "UPI".into()).unwrap();
        let invoice = core.get_invoice("i1".into()).unwrap().unwrap();
        assert_eq!(invoice.status, "Paid");
        assert_eq!(invoice.total_amount, "300.00");

        let html = core.invoice_document_html("i1".into()).unwrap();
        assert!(html.contains("Meera Nair"));
        assert!(html.contains("UPI"));
        assert!(!html.contains("ghost"));

        let text = core.invoice_share_text("i1".into()).unwrap();
        assert!(text.contains("Status: Paid"));
    }

    #[test]
    fn test_ffi_rejects_bad_money_and_status() {
        let core = open_database_in_memory().unwrap();
        let bad_price = core.upsert_test(FfiLabTest {
            id: "t1".into(),
            name: "CBC".into(),
            category: "Hematology".into(),
            price: "three hundred".into(),
            description: None,
        });
        assert!(matches!(bad_price, Err(MedlabError::InvalidInput(_))));

        let bad_status = core.upsert_invoice(FfiInvoice {
            id: "i1".into(),
            patient_id: "p1".into(),
            test_ids: vec![],
            total_amount: "0".into(),
            status: "Refunded".into(),
            payment_method: None,
            created_at: String::new(),
        });
        assert!(matches!(bad_status, Err(MedlabError::InvalidInput(_))));
    }

    #[test]
    fn test_ffi_missing_document_is_not_found() {
        let core = open_database_in_memory().unwrap();
        assert!(matches!(
            core.report_document_html("r404".into()),
            Err(MedlabError::NotFound(_))
        ));
        assert!(matches!(
            core.invoice_document_html("".into()),
            Err(MedlabError::InvalidInput(_))
        ));
        assert!(matches!(
            core.mark_invoice_paid("i404".into(), "Cash".into()),
            Err(MedlabError::NotFound(_))
        ));
    }

    #[test]
    fn test_ffi_import_validation_error() {
        let core = open_database_in_memory().unwrap();
        let result = core.import_snapshot_json(r#"{"patients": []}"#.into());
        assert!(matches!(result, Err(MedlabError::ValidationError(_))));
    }

    #[test]
    fn test_ffi_print_report() {
        let core = open_database_in_memory().unwrap();
        core.upsert_report(FfiReport {
            id: "r1".into(),
            patient_id: "p404".into(),
            test_id: "t404".into(),
            date: "2024-03-05".into(),
            results: vec![],
            notes: None,
        })
        .unwrap();

        let unsupported = core.print_report("r1".into(), None).unwrap();
        assert!(!unsupported.success);
        assert_eq!(unsupported.message, "Printing is only available on web platform");

        let dir = tempfile::tempdir().unwrap();
        let written = core
            .print_report("r1".into(), Some(dir.path().to_string_lossy().into_owned()))
            .unwrap();
        assert!(written.success);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_ffi_hospital_patch() {
        let core = open_database_in_memory().unwrap();
        let updated = core
            .update_hospital_details(FfiHospitalDetailsPatch {
                name: Some("City Lab".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.name, "City Lab");
        assert_eq!(core.reset_hospital_details().unwrap().name, "MedLab Diagnostics");
    }
}
