//! Lab report models.

use serde::{Deserialize, Serialize};

/// A recorded result for one measured parameter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    /// Parameter name (e.g., "Hemoglobin")
    pub parameter_name: String,
    /// Measured value as entered
    pub value: String,
    /// Reference range as printed (e.g., "13.5-17.5")
    pub normal_range: String,
    /// Unit (e.g., "g/dL")
    pub unit: String,
    /// Classification supplied by whoever recorded the result
    pub is_normal: bool,
}

/// A lab report: one test performed for one patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Unique report ID
    pub id: String,
    /// Patient ID (unchecked reference)
    pub patient_id: String,
    /// Test ID (unchecked reference)
    pub test_id: String,
    /// Report date
    pub date: String,
    /// Results in recorded order
    pub results: Vec<TestResult>,
    /// Optional pathologist notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Report {
    /// Create an empty report dated now.
    pub fn new(patient_id: impl Into<String>, test_id: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id: patient_id.into(),
            test_id: test_id.into(),
            date: chrono::Utc::now().to_rfc3339(),
            results: Vec::new(),
            notes: None,
        }
    }

    /// Number of results flagged abnormal.
    pub fn abnormal_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_normal).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, is_normal: bool) -> TestResult {
        TestResult {
            parameter_name: name.into(),
            value: "1".into(),
            normal_range: "0-2".into(),
            unit: "mg/dL".into(),
            is_normal,
        }
    }

    #[test]
    fn test_abnormal_count() {
        let mut report = Report::new("p1", "t1");
        report.results = vec![result("A", true), result("B", false), result("C", false)];
        assert_eq!(report.abnormal_count(), 2);
    }

    #[test]
    fn test_deserialize_without_notes() {
        let json = r#"{"id":"r1","patientId":"p1","testId":"t1","date":"2024-03-01","results":[]}"#;
        let report: Report = serde_json::from_str(json).unwrap();
        assert_eq!(report.patient_id, "p1");
        assert!(report.notes.is_none());
    }
}
