//! Shared HTML building blocks for printable documents.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::HospitalDetails;

/// Styles shared by every document.
pub(crate) const BASE_STYLE: &str = r#"
    body { font-family: Arial, sans-serif; margin: 0; padding: 20px; color: #333; }
    .document { max-width: 800px; margin: 0 auto; border: 1px solid #ddd; padding: 24px; }
    .header { display: flex; align-items: center; justify-content: space-between; border-bottom: 2px solid #4A6FA5; padding-bottom: 15px; margin-bottom: 20px; }
    .logo-container { width: 100px; margin-right: 20px; }
    .logo { max-width: 100%; height: auto; }
    .hospital-info { flex: 1; }
    .hospital-name { font-size: 22px; font-weight: bold; color: #4A6FA5; margin-bottom: 5px; }
    .hospital-address, .hospital-contact { font-size: 14px; margin-bottom: 3px; }
    .hospital-reg { font-size: 12px; color: #666; }
    .title { font-size: 24px; color: #4A6FA5; margin: 20px 0; text-align: center; font-weight: bold; }
    .section { margin-bottom: 20px; }
    .section-title { font-size: 16px; font-weight: bold; margin-bottom: 10px; background-color: #f5f5f5; padding: 8px; border-radius: 4px; }
    table { width: 100%; border-collapse: collapse; margin: 20px 0; }
    th, td { border: 1px solid #ddd; padding: 10px; text-align: left; }
    th { background-color: #f3f4f6; font-weight: 600; }
    .footer { margin-top: 30px; font-size: 12px; color: #666; border-top: 1px solid #ddd; padding-top: 10px; text-align: center; }
    .footer-text { margin-bottom: 5px; }
    .print-date { font-style: italic; }
    @media print {
        body { padding: 0; }
        .document { border: none; }
        .no-print { display: none; }
        @page { size: auto; margin: 10mm; }
    }
"#;

/// Escape text for use in HTML content and attribute values.
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Round to two fractional digits, half away from zero.
pub(crate) fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with currency symbol and two decimals.
pub(crate) fn money(symbol: &str, value: Decimal) -> String {
    format!("{}{:.2}", symbol, round_money(value))
}

/// Format a percentage rate without trailing zeros ("18", "2.5").
pub(crate) fn rate(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Format a stored date for display as dd/mm/yyyy.
///
/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates; anything else
/// is shown as stored.
pub(crate) fn display_date(value: &str) -> String {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return ts.format("%d/%m/%Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.format("%d/%m/%Y").to_string();
    }
    value.to_string()
}

pub(crate) fn display_timestamp(value: NaiveDateTime) -> String {
    value.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// Contact line: phone plus whichever optional channels are configured.
fn contact_line(details: &HospitalDetails, include_website: bool) -> String {
    let mut parts = vec![format!("Phone: {}", escape(&details.phone))];
    if let Some(email) = &details.email {
        parts.push(format!("Email: {}", escape(email)));
    }
    if include_website {
        if let Some(website) = &details.website {
            parts.push(format!("Website: {}", escape(website)));
        }
    }
    parts.join(" | ")
}

fn registration_line(details: &HospitalDetails) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(reg) = &details.registration_number {
        parts.push(format!("Reg. No: {}", escape(reg)));
    }
    if let Some(tax_id) = &details.tax_id {
        parts.push(escape(tax_id));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" | "))
    }
}

/// Hospital header block. `leading` is placed before the hospital details
/// (used by invoices for the number and date).
pub(crate) fn hospital_header(
    details: &HospitalDetails,
    leading: Option<&str>,
    include_website: bool,
) -> String {
    let mut html = String::from("<div class=\"header\">\n");

    if let Some(leading) = leading {
        html.push_str(leading);
    }
    if let Some(logo) = &details.logo {
        html.push_str(&format!(
            "<div class=\"logo-container\"><img src=\"{}\" class=\"logo\" alt=\"{} Logo\"></div>\n",
            escape(logo),
            escape(&details.name)
        ));
    }

    html.push_str("<div class=\"hospital-info\">\n");
    html.push_str(&format!(
        "<div class=\"hospital-name\">{}</div>\n",
        escape(&details.name)
    ));
    html.push_str(&format!(
        "<div class=\"hospital-address\">{}</div>\n",
        escape(&details.address)
    ));
    html.push_str(&format!(
        "<div class=\"hospital-contact\">{}</div>\n",
        contact_line(details, include_website)
    ));
    if let Some(reg) = registration_line(details) {
        html.push_str(&format!("<div class=\"hospital-reg\">{}</div>\n", reg));
    }
    html.push_str("</div>\n</div>\n");
    html
}

/// Footer with the configured footer text, a fixed note and the print stamp.
pub(crate) fn footer(details: &HospitalDetails, note: &str, generated_at: NaiveDateTime) -> String {
    let mut html = String::from("<div class=\"footer\">\n");
    if let Some(text) = &details.footer {
        html.push_str(&format!("<div class=\"footer-text\">{}</div>\n", escape(text)));
    }
    html.push_str(&format!("<div class=\"footer-text\">{}</div>\n", escape(note)));
    html.push_str(&format!(
        "<div class=\"print-date\">Printed on: {}</div>\n",
        display_timestamp(generated_at)
    ));
    html.push_str("</div>\n");
    html
}

/// Wrap a body in a complete standalone page.
pub(crate) fn page(title: &str, extra_style: &str, body: &str, print_button: Option<&str>) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", escape(title)));
    html.push_str("<style>");
    html.push_str(BASE_STYLE);
    html.push_str(extra_style);
    html.push_str("</style>\n</head>\n<body>\n<div class=\"document\">\n");
    html.push_str(body);
    if let Some(label) = print_button {
        html.push_str(&format!(
            "<div class=\"no-print\" style=\"text-align: center; margin-top: 20px;\"><button onclick=\"window.print()\">{}</button></div>\n",
            escape(label)
        ));
    }
    html.push_str("</div>\n</body>\n</html>\n");
    html
}
