//! Staff models: doctors and receptionists

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{DoctorId, ReceptionistId};
use super::person::Person;
use super::validation::FieldErrors;

/// A doctor on the roster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<DoctorId>,

    #[serde(flatten)]
    pub person: Person,

    #[serde(default)]
    pub specialization: String,

    #[serde(default)]
    pub on_leave: bool,
}

impl Doctor {
    pub fn new(name: impl Into<String>, specialization: impl Into<String>) -> Self {
        Self {
            person: Person::new(name),
            specialization: specialization.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.person.name
    }

    pub fn is_available(&self) -> bool {
        !self.on_leave
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        self.person.validate_into(&mut errors);
        errors.require(&self.specialization, "specialization");
        errors.into_result()
    }

    /// Filter over name, phone, email and specialization
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self.person.matches(&needle)
            || self.specialization.to_lowercase().contains(&needle)
    }
}

impl fmt::Display for Doctor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dr. {} ({})", self.person.name, self.specialization)
    }
}

/// A receptionist on the roster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receptionist {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receptionist_id: Option<ReceptionistId>,

    #[serde(flatten)]
    pub person: Person,
}

impl Receptionist {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            receptionist_id: None,
            person: Person::new(name),
        }
    }

    pub fn name(&self) -> &str {
        &self.person.name
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        self.person.validate_into(&mut errors);
        errors.into_result()
    }

    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty() || self.person.matches(&needle)
    }
}

impl fmt::Display for Receptionist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.person.name)
    }
}
