//! Invoice models.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment status of an invoice.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum InvoiceStatus {
    /// Issued, not yet paid
    Pending,
    /// Settled
    Paid,
    /// Past its payment terms
    Due,
}

impl InvoiceStatus {
    /// Name as shown to users and stored on disk.
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "Pending",
            InvoiceStatus::Paid => "Paid",
            InvoiceStatus::Due => "Due",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(InvoiceStatus::Pending),
            "Paid" => Ok(InvoiceStatus::Paid),
            "Due" => Ok(InvoiceStatus::Due),
            other => Err(format!("unknown invoice status: {}", other)),
        }
    }
}

/// An invoice issued to a patient for one or more tests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Unique invoice ID
    pub id: String,
    /// Patient ID (unchecked reference)
    pub patient_id: String,
    /// Billed test IDs in order (unchecked references)
    #[serde(rename = "tests")]
    pub test_ids: Vec<String>,
    /// Amount billed, fixed at creation
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    /// Payment status
    pub status: InvoiceStatus,
    /// Payment method once paid (e.g., "Cash", "Card", "UPI")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl Invoice {
    /// Create a pending invoice.
    pub fn new(patient_id: impl Into<String>, test_ids: Vec<String>, total_amount: Decimal) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: patient_id.into(),
            test_ids,
            total_amount,
            status: InvoiceStatus::Pending,
            payment_method: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Number shown on screen and on the printed invoice ("i12" prints as "12").
    pub fn display_number(&self) -> String {
        self.id.replacen('i', "", 1)
    }

    /// Record payment.
    pub fn mark_paid(&mut self, method: impl Into<String>) {
        self.status = InvoiceStatus::Paid;
        self.payment_method = Some(method.into());
    }
}
