//! Lab report documents.

use chrono::NaiveDateTime;
use serde::Serialize;

use super::html::{self, escape};
use super::RenderOptions;
use crate::aggregate::{Lookup, ReportView};
use crate::models::{HospitalDetails, TestResult};

const UNKNOWN_PATIENT: &str = "Unknown Patient";
const UNKNOWN_TEST: &str = "Unknown Test";

const REPORT_STYLE: &str = r#"
    .patient-info { display: grid; grid-template-columns: repeat(2, 1fr); gap: 10px; background-color: #f9fafb; padding: 15px; border-radius: 5px; }
    .patient-field { font-size: 14px; }
    .patient-label { font-weight: bold; margin-right: 5px; }
    .status-normal { color: #065f46; font-weight: 600; }
    .status-abnormal { color: #dc2626; font-weight: 600; }
"#;

/// Everything a report document needs, fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportViewModel {
    pub hospital: HospitalDetails,
    pub report_id: String,
    pub date: String,
    pub patient_name: String,
    pub patient_id: String,
    pub patient_age: Option<u32>,
    pub patient_gender: Option<String>,
    pub test_name: String,
    pub results: Vec<TestResult>,
    pub notes: Option<String>,
}

impl ReportViewModel {
    pub fn from_view(view: &ReportView, hospital: &HospitalDetails) -> Self {
        let (patient_name, patient_id, patient_age, patient_gender) = match &view.patient {
            Lookup::Found(p) => (p.name.clone(), p.id.clone(), Some(p.age), Some(p.gender.clone())),
            Lookup::NotFound { id } => (UNKNOWN_PATIENT.to_string(), id.clone(), None, None),
        };
        let test_name = match &view.test {
            Lookup::Found(test) => test.name.clone(),
            Lookup::NotFound { .. } => UNKNOWN_TEST.to_string(),
        };

        Self {
            hospital: hospital.clone(),
            report_id: view.report.id.clone(),
            date: view.report.date.clone(),
            patient_name,
            patient_id,
            patient_age,
            patient_gender,
            test_name,
            results: view.report.results.clone(),
            notes: view.report.notes.clone(),
        }
    }
}

fn status_label(result: &TestResult) -> (&'static str, &'static str) {
    if result.is_normal {
        ("status-normal", "Normal")
    } else {
        ("status-abnormal", "Abnormal")
    }
}

fn patient_field(label: &str, value: &str) -> String {
    format!(
        "<div class=\"patient-field\"><span class=\"patient-label\">{}:</span><span>{}</span></div>\n",
        label,
        escape(value)
    )
}

pub(crate) fn render_html(
    vm: &ReportViewModel,
    options: &RenderOptions,
    generated_at: NaiveDateTime,
) -> String {
    let mut body = html::hospital_header(&vm.hospital, None, true);

    body.push_str("<h1 class=\"title\">LABORATORY REPORT</h1>\n");

    body.push_str("<div class=\"section\">\n<div class=\"section-title\">Patient Information</div>\n<div class=\"patient-info\">\n");
    body.push_str(&patient_field("Name", &vm.patient_name));
    body.push_str(&patient_field("ID", &vm.patient_id));
    if let Some(age) = vm.patient_age {
        body.push_str(&patient_field("Age", &age.to_string()));
    }
    if let Some(gender) = &vm.patient_gender {
        body.push_str(&patient_field("Gender", gender));
    }
    body.push_str(&patient_field("Report Date", &html::display_date(&vm.date)));
    body.push_str(&patient_field("Report ID", &vm.report_id));
    body.push_str("</div>\n</div>\n");

    body.push_str(&format!(
        "<div class=\"section\">\n<div class=\"section-title\">Test Results: {}</div>\n",
        escape(&vm.test_name)
    ));
    body.push_str("<table>\n<thead>\n<tr><th>Parameter</th><th>Result</th><th>Normal Range</th><th>Units</th><th>Status</th></tr>\n</thead>\n<tbody>\n");
    for result in &vm.results {
        let (class, label) = status_label(result);
        body.push_str(&format!(
            "<tr class=\"result-row\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td class=\"{}\">{}</td></tr>\n",
            escape(&result.parameter_name),
            escape(&result.value),
            escape(&result.normal_range),
            escape(&result.unit),
            class,
            label
        ));
    }
    body.push_str("</tbody>\n</table>\n</div>\n");

    if let Some(notes) = &vm.notes {
        body.push_str(&format!(
            "<div class=\"section\">\n<div class=\"section-title\">Notes</div>\n<p>{}</p>\n</div>\n",
            escape(notes)
        ));
    }

    body.push_str(&html::footer(
        &vm.hospital,
        "This is a computer-generated report and does not require signature.",
        generated_at,
    ));

    html::page(
        &format!("{} - Report", vm.hospital.name),
        REPORT_STYLE,
        &body,
        options.print_button.then_some("Print Report"),
    )
}

/// Plain-text rendition for the share action.
pub(crate) fn render_text(vm: &ReportViewModel) -> String {
    let mut lines = vec![
        vm.hospital.name.clone(),
        vm.hospital.address.clone(),
        format!("Phone: {}", vm.hospital.phone),
        String::new(),
        "LABORATORY REPORT".into(),
        String::new(),
        format!("Report ID: {}", vm.report_id),
        format!("Date: {}", html::display_date(&vm.date)),
        format!("Patient: {}", vm.patient_name),
        format!("Test: {}", vm.test_name),
        String::new(),
        "Results:".into(),
    ];
    for result in &vm.results {
        let (_, label) = status_label(result);
        lines.push(format!(
            "{}: {} {} (Normal: {}) - {}",
            result.parameter_name, result.value, result.unit, result.normal_range, label
        ));
    }
    if let Some(notes) = &vm.notes {
        lines.push(String::new());
        lines.push(format!("Notes: {}", notes));
    }
    lines.push(String::new());
    lines.push(
        vm.hospital
            .footer
            .clone()
            .unwrap_or_else(|| "This is a computer-generated report. No signature is required.".into()),
    );
    lines.join("\n")
}
