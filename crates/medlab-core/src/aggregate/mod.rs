//! Cross-store aggregation.
//!
//! Resolves the loose id references between collections (invoice → patient,
//! invoice → tests, report → patient/test) into read-only views. References
//! that do not resolve come back as [`Lookup::NotFound`] instead of errors,
//! so partially hydrated or inconsistent data still renders.

mod view;

pub use view::*;

use thiserror::Error;

use crate::db::{Database, DbError, Store};

/// Aggregation errors.
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

pub type AggregateResult<T> = Result<T, AggregateError>;

/// Which entity a view is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Invoice,
    Report,
}

/// Read-only projection over the current store contents.
pub struct Aggregator<'a> {
    db: &'a Database,
}

impl<'a> Aggregator<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Build the view for an entity of the given kind.
    pub fn view(&self, kind: EntityKind, id: &str) -> AggregateResult<Lookup<EntityView>> {
        Ok(match kind {
            EntityKind::Invoice => self.invoice(id)?.map(EntityView::Invoice),
            EntityKind::Report => self.report(id)?.map(EntityView::Report),
        })
    }

    /// Resolve an invoice with its patient and billed tests.
    ///
    /// Test ids that do not resolve are dropped from `tests` and listed in
    /// `missing_test_ids`; the stored total is left untouched.
    pub fn invoice(&self, id: &str) -> AggregateResult<Lookup<InvoiceView>> {
        require_id(id)?;

        let Some(invoice) = self.db.invoices().get_by_id(id)? else {
            return Ok(Lookup::NotFound { id: id.to_string() });
        };

        let patient = self.patient(&invoice.patient_id)?;

        let test_store = self.db.tests();
        let mut tests = Vec::with_capacity(invoice.test_ids.len());
        let mut missing_test_ids = Vec::new();
        for test_id in &invoice.test_ids {
            match test_store.get_by_id(test_id)? {
                Some(test) => tests.push(test),
                None => missing_test_ids.push(test_id.clone()),
            }
        }

        if !missing_test_ids.is_empty() {
            tracing::warn!(
                invoice = %invoice.id,
                missing = ?missing_test_ids,
                "invoice references unknown tests"
            );
        }

        Ok(Lookup::Found(InvoiceView {
            invoice,
            patient,
            tests,
            missing_test_ids,
        }))
    }

    /// Resolve a report with its patient and test.
    pub fn report(&self, id: &str) -> AggregateResult<Lookup<ReportView>> {
        require_id(id)?;

        let Some(report) = self.db.reports().get_by_id(id)? else {
            return Ok(Lookup::NotFound { id: id.to_string() });
        };

        let patient = self.patient(&report.patient_id)?;
        let test = Lookup::from_option(self.db.tests().get_by_id(&report.test_id)?, &report.test_id);
        if test.is_not_found() {
            tracing::warn!(report = %report.id, test = %report.test_id, "report references unknown test");
        }

        Ok(Lookup::Found(ReportView {
            report,
            patient,
            test,
        }))
    }

    fn patient(&self, patient_id: &str) -> AggregateResult<Lookup<crate::models::Patient>> {
        let patient = Lookup::from_option(self.db.patients().get_by_id(patient_id)?, patient_id);
        if patient.is_not_found() {
            tracing::warn!(patient = patient_id, "reference to unknown patient");
        }
        Ok(patient)
    }
}

fn require_id(id: &str) -> AggregateResult<()> {
    if id.trim().is_empty() {
        return Err(AggregateError::InvalidInput("id must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Invoice, LabTest, Patient, Report};
    use rust_decimal::Decimal;

    fn seed(db: &Database) -> (Patient, LabTest, LabTest) {
        let mut patient = Patient::new("Meera Nair", 52, "Female");
        patient.id = "p1".into();
        let mut t1 = LabTest::new("CBC", "Hematology", Decimal::new(300, 0));
        t1.id = "t1".into();
        let mut t2 = LabTest::new("Lipid Profile", "Biochemistry", Decimal::new(250, 0));
        t2.id = "t2".into();

        db.patients().upsert(&patient).unwrap();
        db.tests().upsert(&t1).unwrap();
        db.tests().upsert(&t2).unwrap();
        (patient, t1, t2)
    }

    fn invoice(id: &str, patient_id: &str, tests: &[&str]) -> Invoice {
        let mut invoice = Invoice::new(
            patient_id,
            tests.iter().map(|t| t.to_string()).collect(),
            Decimal::new(500, 0),
        );
        invoice.id = id.into();
        invoice
    }

    #[test]
    fn test_invoice_fully_resolved() {
        let db = Database::open_in_memory().unwrap();
        let (patient, t1, t2) = seed(&db);
        db.invoices().upsert(&invoice("i1", "p1", &["t1", "t2"])).unwrap();

        let view = Aggregator::new(&db).invoice("i1").unwrap().found().unwrap();
        assert_eq!(view.patient, Lookup::Found(patient));
        assert_eq!(view.tests, vec![t1, t2]);
        assert!(view.missing_test_ids.is_empty());
    }

    #[test]
    fn test_invoice_missing_test_filtered() {
        let db = Database::open_in_memory().unwrap();
        let (_, t1, _) = seed(&db);
        db.invoices()
            .upsert(&invoice("i1", "p1", &["t1", "ghost"]))
            .unwrap();

        let view = Aggregator::new(&db).invoice("i1").unwrap().found().unwrap();
        assert_eq!(view.tests, vec![t1]);
        assert_eq!(view.missing_test_ids, vec!["ghost"]);
        assert_eq!(view.invoice.total_amount, Decimal::new(500, 0));
    }

    #[test]
    fn test_invoice_missing_patient_is_sentinel() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        db.invoices().upsert(&invoice("i1", "nobody", &["t1"])).unwrap();

        let view = Aggregator::new(&db).invoice("i1").unwrap().found().unwrap();
        assert_eq!(
            view.patient,
            Lookup::NotFound {
                id: "nobody".into()
            }
        );
    }

    #[test]
    fn test_unknown_entity_is_sentinel() {
        let db = Database::open_in_memory().unwrap();
        let aggregator = Aggregator::new(&db);
        assert!(aggregator.invoice("i404").unwrap().is_not_found());
        assert!(aggregator
            .view(EntityKind::Report, "r404")
            .unwrap()
            .is_not_found());
    }

    #[test]
    fn test_empty_id_rejected() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            Aggregator::new(&db).report("  "),
            Err(AggregateError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_report_with_unknown_test() {
        let db = Database::open_in_memory().unwrap();
        seed(&db);
        let mut report = Report::new("p1", "t-retired");
        report.id = "r1".into();
        db.reports().upsert(&report).unwrap();

        let view = Aggregator::new(&db).report("r1").unwrap().found().unwrap();
        assert!(view.patient.is_found());
        assert_eq!(
            view.test,
            Lookup::NotFound {
                id: "t-retired".into()
            }
        );
    }
}
