//! Laboratory profile printed on every document.

use serde::{Deserialize, Serialize};

/// The laboratory's own details (singleton).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HospitalDetails {
    pub name: String,
    pub address: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    /// Logo URL or data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    /// Footer line printed above the generated-on stamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<String>,
}

impl Default for HospitalDetails {
    fn default() -> Self {
        Self {
            name: "MedLab Diagnostics".into(),
            address: "123 Healthcare Avenue, Medical District, City".into(),
            phone: "+1 (555) 123-4567".into(),
            email: Some("info@medlabdiagnostics.com".into()),
            website: Some("www.medlabdiagnostics.com".into()),
            registration_number: Some("MED-LAB-12345".into()),
            tax_id: Some("TAX-ID-67890".into()),
            logo: Some(
                "https://images.unsplash.com/photo-1505751172876-fa1923c5c528?q=80&w=200&auto=format&fit=crop"
                    .into(),
            ),
            footer: Some(
                "Thank you for choosing MedLab Diagnostics. For any queries, please contact our customer support."
                    .into(),
            ),
            bank_details: None,
        }
    }
}

/// Partial profile update. Present fields overwrite, absent fields are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HospitalDetailsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<String>,
}

impl HospitalDetails {
    /// Overlay a patch field by field.
    pub fn apply(&mut self, patch: HospitalDetailsPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        overlay(&mut self.email, patch.email);
        overlay(&mut self.website, patch.website);
        overlay(&mut self.registration_number, patch.registration_number);
        overlay(&mut self.tax_id, patch.tax_id);
        overlay(&mut self.logo, patch.logo);
        overlay(&mut self.footer, patch.footer);
        overlay(&mut self.bank_details, patch.bank_details);
    }
}

impl From<HospitalDetails> for HospitalDetailsPatch {
    fn from(details: HospitalDetails) -> Self {
        Self {
            name: Some(details.name),
            address: Some(details.address),
            phone: Some(details.phone),
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

fn overlay(field: &mut Option<String>, value: Option<String>) {
    if value.is_some() {
        *field = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_overlays_only_present_fields() {
        let mut details = HospitalDetails::default();
        details.apply(HospitalDetailsPatch {
            name: Some("City Path Lab".into()),
            footer: Some("Get well soon".into()),
            ..Default::default()
        });

        assert_eq!(details.name, "City Path Lab");
        assert_eq!(details.footer.as_deref(), Some("Get well soon"));
        assert_eq!(details.phone, HospitalDetails::default().phone);
        assert!(details.email.is_some());
    }

    #[test]
    fn test_deserialize_minimal_profile() {
        let json = r#"{"name":"Lab","address":"Main St","phone":"123"}"#;
        let details: HospitalDetails = serde_json::from_str(json).unwrap();
        assert!(details.email.is_none());
        assert!(details.tax_id.is_none());
    }
}
