//! Denormalized views built by the aggregator.

use rust_decimal::Decimal;

use crate::models::{Invoice, LabTest, Patient, Report};

/// Result of resolving an id reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    NotFound { id: String },
}

impl<T> Lookup<T> {
    pub fn from_option(value: Option<T>, id: &str) -> Self {
        match value {
            Some(value) => Lookup::Found(value),
            None => Lookup::NotFound { id: id.to_string() },
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn is_not_found(&self) -> bool {
        !self.is_found()
    }

    /// The resolved value, if any.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::NotFound { .. } => None,
        }
    }

    pub fn as_ref(&self) -> Lookup<&T> {
        match self {
            Lookup::Found(value) => Lookup::Found(value),
            Lookup::NotFound { id } => Lookup::NotFound { id: id.clone() },
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotFound { id } => Lookup::NotFound { id },
        }
    }
}

/// An invoice with its references resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceView {
    pub invoice: Invoice,
    pub patient: Lookup<Patient>,
    /// Resolved tests in invoice order
    pub tests: Vec<LabTest>,
    /// Test ids that did not resolve, in invoice order
    pub missing_test_ids: Vec<String>,
}

impl InvoiceView {
    /// Sum of current prices of the resolved tests.
    pub fn live_subtotal(&self) -> Decimal {
        self.tests.iter().map(|t| t.price).sum()
    }

    /// Whether current prices no longer add up to the stored total.
    ///
    /// Divergence is reported, never corrected: the stored total is the
    /// amount that was billed.
    pub fn diverges_from_stored_total(&self) -> bool {
        self.live_subtotal() != self.invoice.total_amount
    }
}

/// A report with its references resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportView {
    pub report: Report,
    pub patient: Lookup<Patient>,
    pub test: Lookup<LabTest>,
}

/// View for either entity kind.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityView {
    Invoice(InvoiceView),
    Report(ReportView),
}
