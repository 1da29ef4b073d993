//! Invoice documents.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::Serialize;

use super::html::{self, escape};
use super::RenderOptions;
use crate::aggregate::{InvoiceView, Lookup};
use crate::models::{HospitalDetails, InvoiceStatus};

const UNKNOWN_PATIENT: &str = "Unknown Patient";

const INVOICE_STYLE: &str = r#"
    .invoice-id { font-size: 18px; font-weight: bold; color: #4A6FA5; }
    .invoice-info { margin-right: 20px; }
    .patient-info { margin: 20px 0; padding: 15px; background-color: #f9fafb; border-radius: 5px; }
    .payment-status { display: inline-block; padding: 6px 12px; border-radius: 20px; font-weight: bold; text-transform: uppercase; font-size: 12px; letter-spacing: 1px; }
    .status-paid { background-color: #d1fae5; color: #065f46; }
    .status-pending { background-color: #fef3c7; color: #92400e; }
    .status-due { background-color: #fee2e2; color: #b91c1c; }
    .invoice-total { margin-top: 30px; display: flex; justify-content: flex-end; }
    .total-table { width: 300px; }
    .total-table td { border: none; padding: 8px; }
    .total-row td { font-weight: bold; font-size: 18px; border-top: 2px solid #4A6FA5; }
    .payment-info { margin-top: 30px; border-top: 1px solid #ddd; padding-top: 15px; }
"#;

/// One billed line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub description: String,
    /// Catalog code (the test id)
    pub code: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    pub fn amount(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Everything an invoice document needs, fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceViewModel {
    pub hospital: HospitalDetails,
    pub invoice_id: String,
    /// Number printed in the header
    pub invoice_number: String,
    pub date: String,
    pub patient_name: String,
    pub patient_id: String,
    pub status: InvoiceStatus,
    pub items: Vec<LineItem>,
    pub payment_method: Option<String>,
    pub payment_terms: Option<String>,
    /// Percent, e.g. 18 for 18%
    pub tax_rate: Option<Decimal>,
    /// Percent
    pub discount_rate: Option<Decimal>,
    /// Amount stored on the invoice record
    pub billed_amount: Decimal,
}

/// Computed money figures for an invoice document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InvoiceTotals {
    /// Sum of line amounts at current prices
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub discount: Decimal,
    /// subtotal + tax - discount
    pub total: Decimal,
    /// Stored invoice amount, not reconciled with `total`
    pub billed: Decimal,
}

impl InvoiceViewModel {
    /// Build from an aggregated view. Unresolved tests are already absent
    /// from the view; an unresolved patient prints as a placeholder.
    pub fn from_view(view: &InvoiceView, hospital: &HospitalDetails) -> Self {
        let (patient_name, patient_id) = match &view.patient {
            Lookup::Found(patient) => (patient.name.clone(), patient.id.clone()),
            Lookup::NotFound { id } => (UNKNOWN_PATIENT.to_string(), id.clone()),
        };

        let items = view
            .tests
            .iter()
            .map(|test| LineItem {
                description: test.name.clone(),
                code: test.id.clone(),
                price: test.price,
                quantity: 1,
            })
            .collect();

        Self {
            hospital: hospital.clone(),
            invoice_id: view.invoice.id.clone(),
            invoice_number: view.invoice.display_number(),
            date: view.invoice.created_at.clone(),
            patient_name,
            patient_id,
            status: view.invoice.status,
            items,
            payment_method: view.invoice.payment_method.clone(),
            payment_terms: None,
            tax_rate: None,
            discount_rate: None,
            billed_amount: view.invoice.total_amount,
        }
    }

    pub fn totals(&self) -> InvoiceTotals {
        let subtotal = html::round_money(self.items.iter().map(LineItem::amount).sum());
        let percent_of = |rate: Option<Decimal>| {
            html::round_money(subtotal * rate.unwrap_or(Decimal::ZERO) / Decimal::ONE_HUNDRED)
        };
        let tax = percent_of(self.tax_rate);
        let discount = percent_of(self.discount_rate);

        InvoiceTotals {
            subtotal,
            tax,
            discount,
            total: subtotal + tax - discount,
            billed: self.billed_amount,
        }
    }
}

fn present_rate(rate: Option<Decimal>) -> Option<Decimal> {
    rate.filter(|r| !r.is_zero())
}

pub(crate) fn render_html(
    vm: &InvoiceViewModel,
    options: &RenderOptions,
    generated_at: NaiveDateTime,
) -> String {
    let symbol = options.currency_symbol.as_str();
    let totals = vm.totals();
    let mut body = String::new();

    // Header: number/date on the left, laboratory on the right
    let leading = format!(
        "<div class=\"invoice-info\">\n<div class=\"invoice-id\">Invoice #{}</div>\n<div>Date: {}</div>\n</div>\n",
        escape(&vm.invoice_number),
        escape(&html::display_date(&vm.date))
    );
    body.push_str(&html::hospital_header(&vm.hospital, Some(&leading), false));

    body.push_str("<h1 class=\"title\">INVOICE</h1>\n");

    body.push_str("<div class=\"patient-info\">\n<h3>Patient Information</h3>\n");
    body.push_str(&format!(
        "<div><strong>Name:</strong> {}</div>\n",
        escape(&vm.patient_name)
    ));
    body.push_str(&format!(
        "<div><strong>Patient ID:</strong> {}</div>\n",
        escape(&vm.patient_id)
    ));
    body.push_str(&format!(
        "<div><strong>Status:</strong> <span class=\"payment-status status-{}\">{}</span></div>\n",
        vm.status.as_str().to_lowercase(),
        vm.status
    ));
    body.push_str("</div>\n");

    body.push_str("<table class=\"invoice-items\">\n<thead>\n<tr><th>Test Description</th><th>Code</th><th>Qty</th><th>Price</th></tr>\n</thead>\n<tbody>\n");
    for item in &vm.items {
        let code = if item.code.is_empty() { "-" } else { item.code.as_str() };
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape(&item.description),
            escape(code),
            item.quantity,
            html::money(symbol, item.amount())
        ));
    }
    body.push_str("</tbody>\n</table>\n");

    body.push_str("<div class=\"invoice-total\">\n<table class=\"total-table\">\n");
    body.push_str(&format!(
        "<tr><td>Subtotal:</td><td>{}</td></tr>\n",
        html::money(symbol, totals.subtotal)
    ));
    if let Some(rate) = present_rate(vm.tax_rate) {
        body.push_str(&format!(
            "<tr><td>Tax ({}%):</td><td>{}</td></tr>\n",
            html::rate(rate),
            html::money(symbol, totals.tax)
        ));
    }
    if let Some(rate) = present_rate(vm.discount_rate) {
        body.push_str(&format!(
            "<tr><td>Discount ({}%):</td><td>-{}</td></tr>\n",
            html::rate(rate),
            html::money(symbol, totals.discount)
        ));
    }
    body.push_str(&format!(
        "<tr class=\"total-row\"><td>Total:</td><td>{}</td></tr>\n",
        html::money(symbol, totals.total)
    ));
    body.push_str(&format!(
        "<tr class=\"billed-row\"><td>Amount Billed:</td><td>{}</td></tr>\n",
        html::money(symbol, totals.billed)
    ));
    body.push_str("</table>\n</div>\n");

    body.push_str("<div class=\"payment-info\">\n<h3>Payment Information</h3>\n");
    body.push_str(&format!(
        "<div><strong>Payment Method:</strong> {}</div>\n",
        escape(vm.payment_method.as_deref().unwrap_or("Not paid yet"))
    ));
    body.push_str(&format!(
        "<div><strong>Payment Terms:</strong> {}</div>\n",
        escape(vm.payment_terms.as_deref().unwrap_or(&options.payment_terms))
    ));
    if let Some(bank) = &vm.hospital.bank_details {
        body.push_str(&format!(
            "<div><strong>Bank Details:</strong> {}</div>\n",
            escape(bank)
        ));
    }
    body.push_str("</div>\n");

    body.push_str(&html::footer(
        &vm.hospital,
        "This is a computer-generated invoice and does not require signature.",
        generated_at,
    ));

    html::page(
        &format!("{} - Invoice", vm.hospital.name),
        INVOICE_STYLE,
        &body,
        options.print_button.then_some("Print Invoice"),
    )
}

/// Plain-text rendition for the share action.
pub(crate) fn render_text(vm: &InvoiceViewModel, options: &RenderOptions) -> String {
    let symbol = options.currency_symbol.as_str();
    let mut lines = vec![
        vm.hospital.name.clone(),
        vm.hospital.address.clone(),
        format!("Phone: {}", vm.hospital.phone),
    ];
    if let Some(email) = &vm.hospital.email {
        lines.push(format!("Email: {}", email));
    }
    lines.push(String::new());
    lines.push("INVOICE".into());
    lines.push(String::new());
    lines.push(format!("Invoice #: {}", vm.invoice_number));
    lines.push(format!("Date: {}", html::display_date(&vm.date)));
    lines.push(format!("Patient: {}", vm.patient_name));
    lines.push(format!("Status: {}", vm.status));
    lines.push(String::new());
    lines.push("Tests:".into());
    for item in &vm.items {
        lines.push(format!(
            "{} - {}",
            item.description,
            html::money(symbol, item.amount())
        ));
    }
    lines.push(String::new());
    lines.push(format!(
        "Total Amount: {}",
        html::money(symbol, vm.billed_amount)
    ));
    lines.push(format!(
        "Payment Method: {}",
        vm.payment_method.as_deref().unwrap_or("Not paid yet")
    ));
    lines.push(String::new());
    lines.push(
        vm.hospital
            .footer
            .clone()
            .unwrap_or_else(|| "This is a computer-generated invoice. No signature is required.".into()),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(code: &str, price: i64, quantity: u32) -> LineItem {
        LineItem {
            description: format!("Test {}", code),
            code: code.into(),
            price: Decimal::new(price, 2),
            quantity,
        }
    }

    fn printed_at() -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn make_vm() -> InvoiceViewModel {
        InvoiceViewModel {
            hospital: HospitalDetails::default(),
            invoice_id: "i7".into(),
            invoice_number: "7".into(),
            date: "2024-03-05T10:15:00Z".into(),
            patient_name: "Meera Nair".into(),
            patient_id: "p1".into(),
            status: InvoiceStatus::Pending,
            items: vec![item("t1", 30000, 1), item("t2", 12550, 2)],
            payment_method: None,
            payment_terms: None,
            tax_rate: None,
            discount_rate: None,
            billed_amount: Decimal::new(50000, 2),
        }
    }

    #[test]
    fn test_totals_without_rates() {
        let totals = make_vm().totals();
        assert_eq!(totals.subtotal, Decimal::new(55100, 2));
        assert_eq!(totals.tax, Decimal::ZERO);
        assert_eq!(totals.discount, Decimal::ZERO);
        assert_eq!(totals.total, totals.subtotal);
        assert_eq!(totals.billed, Decimal::new(50000, 2));
    }

    #[test]
    fn test_totals_with_rates() {
        let mut vm = make_vm();
        vm.items = vec![item("t1", 100000, 1)];
        vm.tax_rate = Some(Decimal::new(18, 0));
        vm.discount_rate = Some(Decimal::new(5, 0));

        let totals = vm.totals();
        assert_eq!(totals.tax, Decimal::new(180, 0));
        assert_eq!(totals.discount, Decimal::new(50, 0));
        assert_eq!(totals.total, Decimal::new(1130, 0));
    }

    #[test]
    fn test_tax_rounds_to_cents() {
        let mut vm = make_vm();
        vm.items = vec![item("t1", 999, 1)];
        vm.tax_rate = Some(Decimal::new(125, 1)); // 12.5%

        // 9.99 * 12.5% = 1.24875
        assert_eq!(vm.totals().tax, Decimal::new(125, 2));
    }

    #[test]
    fn test_html_rows_and_optional_lines() {
        let html = render_html(&make_vm(), &RenderOptions::default(), printed_at());
        assert!(html.contains("Invoice #7"));
        assert!(html.contains("status-pending"));
        assert!(html.contains("<td>₹251.00</td>"));
        assert!(html.contains("Subtotal:</td><td>₹551.00"));
        assert!(html.contains("Amount Billed:</td><td>₹500.00"));
        assert!(!html.contains("Tax ("));
        assert!(!html.contains("Discount ("));
        assert!(html.contains("Not paid yet"));
        assert!(html.contains("Due on receipt"));
    }

    #[test]
    fn test_share_text_uses_stored_total() {
        let text = render_text(&make_vm(), &RenderOptions::default());
        assert!(text.contains("Invoice #: 7"));
        assert!(text.contains("Test t2 - ₹251.00"));
        assert!(text.contains("Total Amount: ₹500.00"));
        assert!(text.ends_with(HospitalDetails::default().footer.unwrap().as_str()));
    }
}
