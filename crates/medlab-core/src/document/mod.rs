//! Printable document generation.
//!
//! Turns resolved view models into standalone HTML documents with a fixed
//! section order: hospital header, title, entity info, line items or
//! results, totals or notes, footer. Output depends only on the view model,
//! the render options and the supplied generation timestamp.

mod html;
mod invoice;
mod report;

pub use invoice::{InvoiceTotals, InvoiceViewModel, LineItem};
pub use report::ReportViewModel;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Document kinds the generator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Report,
    Invoice,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Report => "report",
            DocumentKind::Invoice => "invoice",
        }
    }
}

/// Resolved input for one document.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewModel {
    Report(ReportViewModel),
    Invoice(InvoiceViewModel),
}

impl ViewModel {
    pub fn kind(&self) -> DocumentKind {
        match self {
            ViewModel::Report(_) => DocumentKind::Report,
            ViewModel::Invoice(_) => DocumentKind::Invoice,
        }
    }

    /// ID of the underlying record.
    pub fn entity_id(&self) -> &str {
        match self {
            ViewModel::Report(vm) => &vm.report_id,
            ViewModel::Invoice(vm) => &vm.invoice_id,
        }
    }
}

/// A rendered document ready to hand to a presenter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub kind: DocumentKind,
    /// ID of the report or invoice it was rendered from
    pub entity_id: String,
    /// Window/file title
    pub title: String,
    pub html: String,
}

/// Rendering knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// Prefix for money amounts
    pub currency_symbol: String,
    /// Printed when the invoice carries no terms of its own
    pub payment_terms: String,
    /// Include the on-screen print button (hidden when printing)
    pub print_button: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "₹".into(),
            payment_terms: "Due on receipt".into(),
            print_button: true,
        }
    }
}

/// Renders view models into documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentGenerator {
    options: RenderOptions,
}

impl DocumentGenerator {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render, stamping the current local time in the footer.
    pub fn generate(&self, view_model: &ViewModel) -> Document {
        self.generate_at(view_model, Local::now().naive_local())
    }

    /// Render with an explicit generation timestamp.
    pub fn generate_at(&self, view_model: &ViewModel, generated_at: NaiveDateTime) -> Document {
        let (title, html) = match view_model {
            ViewModel::Report(vm) => (
                format!("{} - Report", vm.hospital.name),
                report::render_html(vm, &self.options, generated_at),
            ),
            ViewModel::Invoice(vm) => (
                format!("{} - Invoice", vm.hospital.name),
                invoice::render_html(vm, &self.options, generated_at),
            ),
        };

        tracing::debug!(
            kind = view_model.kind().as_str(),
            id = view_model.entity_id(),
            bytes = html.len(),
            "document generated"
        );

        Document {
            kind: view_model.kind(),
            entity_id: view_model.entity_id().to_string(),
            title,
            html,
        }
    }

    /// Plain-text rendition used by the share action.
    pub fn share_text(&self, view_model: &ViewModel) -> String {
        match view_model {
            ViewModel::Report(vm) => report::render_text(vm),
            ViewModel::Invoice(vm) => invoice::render_text(vm, &self.options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HospitalDetails, InvoiceStatus};
    use rust_decimal::Decimal;

    fn invoice_vm(hospital: HospitalDetails) -> ViewModel {
        ViewModel::Invoice(InvoiceViewModel {
            hospital,
            invoice_id: "i1".into(),
            invoice_number: "1".into(),
            date: "2024-03-05T10:15:00Z".into(),
            patient_name: "Meera Nair".into(),
            patient_id: "p1".into(),
            status: InvoiceStatus::Paid,
            items: vec![],
            payment_method: Some("Card".into()),
            payment_terms: None,
            tax_rate: Some(Decimal::ZERO),
            discount_rate: None,
            billed_amount: Decimal::ZERO,
        })
    }

    #[test]
    fn test_section_order() {
        let doc = DocumentGenerator::default().generate(&invoice_vm(HospitalDetails::default()));
        let html = &doc.html;

        let header = html.find("class=\"header\"").unwrap();
        let title = html.find("<h1 class=\"title\">").unwrap();
        let info = html.find("Patient Information").unwrap();
        let items = html.find("<table class=\"invoice-items\">").unwrap();
        let totals = html.find("<table class=\"total-table\">").unwrap();
        let footer = html.find("class=\"footer\"").unwrap();
        assert!(header < title && title < info && info < items && items < totals && totals < footer);
        assert_eq!(doc.kind, DocumentKind::Invoice);
        assert_eq!(doc.entity_id, "i1");
    }

    #[test]
    fn test_absent_optionals_never_leak() {
        let hospital = HospitalDetails {
            name: "Bare Lab".into(),
            address: "Road".into(),
            phone: "1".into(),
            email: None,
            website: None,
            registration_number: None,
            tax_id: None,
            logo: None,
            footer: None,
            bank_details: None,
        };
        let html = DocumentGenerator::default().generate(&invoice_vm(hospital)).html;

        for token in ["undefined", "null", "None", "Email:", "Reg. No", "Tax ("] {
            assert!(!html.contains(token), "unexpected {:?}", token);
        }
    }

    #[test]
    fn test_print_button_optional() {
        let generator = DocumentGenerator::new(RenderOptions {
            print_button: false,
            ..Default::default()
        });
        let html = generator.generate(&invoice_vm(HospitalDetails::default())).html;
        assert!(!html.contains("window.print()"));
    }
}
