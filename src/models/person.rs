//! Fields shared by patients, doctors and receptionists

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates;
use super::validation::{looks_like_email, FieldErrors};

/// Contact and demographic details common to every person record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,

    #[serde(
        default,
        with = "dates::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_joined: Option<NaiveDate>,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Validate the shared fields, appending to `errors`
    pub fn validate_into(&self, errors: &mut FieldErrors) {
        errors.require(&self.name, "name");
        if let Some(email) = self.email.as_deref().filter(|e| !e.is_empty()) {
            errors.check(looks_like_email(email), "email", "is not a valid address");
        }
        if let Some(age) = self.age {
            errors.check(age <= 150, "age", "must be between 0 and 150");
        }
        if let Some(phone) = self.phone.as_deref().filter(|p| !p.is_empty()) {
            let digits = phone.chars().filter(|c| c.is_ascii_digit()).count();
            let allowed = phone
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '+' | ' ' | '-' | '(' | ')'));
            errors.check(allowed && digits >= 6, "phone", "is not a valid number");
        }
    }

    /// Case-insensitive match against name, phone and email
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .phone
                .as_deref()
                .is_some_and(|p| p.to_lowercase().contains(needle))
            || self
                .email
                .as_deref()
                .is_some_and(|e| e.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_person() {
        let mut person = Person::new("");
        person.email = Some("bad".into());
        person.age = Some(200);
        person.phone = Some("12ab".into());

        let mut errors = FieldErrors::new();
        person.validate_into(&mut errors);
        assert!(errors.has("name"));
        assert!(errors.has("email"));
        assert!(errors.has("age"));
        assert!(errors.has("phone"));
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let mut person = Person::new("Amina Alaoui");
        person.phone = Some("+212 600-112233".into());
        assert!(person.matches("alaoui"));
        assert!(person.matches("600-11"));
        assert!(!person.matches("bennani"));
    }

    #[test]
    fn test_deserialize_backend_shape() {
        let json = r#"{"name":"Sara","age":null,"dateJoined":"2024-05-01T10:00:00.000Z"}"#;
        let person: Person = serde_json::from_str(json).unwrap();
        assert_eq!(person.name, "Sara");
        assert_eq!(person.age, None);
        assert_eq!(person.date_joined, NaiveDate::from_ymd_opt(2024, 5, 1));
    }
}
