//! Patient model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::PatientId;
use super::person::Person;
use super::validation::FieldErrors;

/// A patient record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Backend-assigned id, absent until created
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<PatientId>,

    #[serde(flatten)]
    pub person: Person,

    /// National identity card number
    #[serde(rename = "CIN", default)]
    pub cin: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disease: Option<String>,

    #[serde(default)]
    pub documents: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(default)]
    pub medical_history: Vec<String>,
}

impl Patient {
    pub fn new(name: impl Into<String>, cin: impl Into<String>) -> Self {
        Self {
            person: Person::new(name),
            cin: cin.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.person.name
    }

    /// Id as display text, "-" before creation
    pub fn id_display(&self) -> String {
        self.patient_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string())
    }

    /// Validate before submission
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        self.person.validate_into(&mut errors);
        errors.require(&self.cin, "cin");
        errors.check(
            self.cin.chars().all(|c| c.is_ascii_alphanumeric()),
            "cin",
            "must contain only letters and digits",
        );
        errors.into_result()
    }

    /// Filter predicate over name, CIN, phone and email
    ///
    /// An empty query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.person.matches(&needle) || self.cin.to_lowercase().contains(&needle)
    }
}

impl fmt::Display for Patient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.person.name, self.cin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_wire_format() {
        let json = r#"{
            "patientId": "p1",
            "name": "Youssef",
            "CIN": "AB12345",
            "documents": ["scan.pdf"],
            "medicalHistory": ["asthma"]
        }"#;
        let patient: Patient = serde_json::from_str(json).unwrap();
        assert_eq!(patient.patient_id, Some(PatientId::new("p1")));
        assert_eq!(patient.cin, "AB12345");
        assert_eq!(patient.medical_history, vec!["asthma".to_string()]);

        let out = serde_json::to_value(&patient).unwrap();
        assert_eq!(out["CIN"], "AB12345");
        assert_eq!(out["name"], "Youssef");
    }

    #[test]
    fn test_validate_requires_cin() {
        let patient = Patient::new("Youssef", "");
        let errors = patient.validate().unwrap_err();
        assert!(errors.has("cin"));

        assert!(Patient::new("Youssef", "AB12345").validate().is_ok());
    }

    #[test]
    fn test_matches_cin() {
        let patient = Patient::new("Youssef", "AB12345");
        assert!(patient.matches("ab123"));
        assert!(patient.matches(""));
        assert!(!patient.matches("zz"));
    }
}
