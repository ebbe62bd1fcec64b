//! Field-level validation results
//!
//! Forms report every failing field at once rather than stopping at the
//! first one, so the user can fix them in a single pass.

use std::fmt;

use crate::error::CabinetError;

/// One failing field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All failing fields of a record or form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error for `field`
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record an error for `field` unless `ok` holds
    pub fn check(&mut self, ok: bool, field: &'static str, message: impl Into<String>) {
        if !ok {
            self.push(field, message);
        }
    }

    /// Record a "required" error when `value` is blank
    pub fn require(&mut self, value: &str, field: &'static str) {
        if value.trim().is_empty() {
            self.push(field, "is required");
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether a specific field failed
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Append another set of errors
    pub fn extend(&mut self, other: FieldErrors) {
        self.0.extend(other.0);
    }

    /// `Ok(())` when nothing failed
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{} {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

impl From<FieldErrors> for CabinetError {
    fn from(errors: FieldErrors) -> Self {
        CabinetError::Validation(errors.to_string())
    }
}

/// Loose email shape check: something@something.tld
pub fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_all_errors() {
        let mut errors = FieldErrors::new();
        errors.require("", "name");
        errors.check(false, "price", "must be non-negative");
        errors.require("ok", "cin");

        assert_eq!(errors.len(), 2);
        assert!(errors.has("name"));
        assert!(!errors.has("cin"));
        assert_eq!(errors.to_string(), "name is required; price must be non-negative");
    }

    #[test]
    fn test_into_result() {
        assert!(FieldErrors::new().into_result().is_ok());

        let mut errors = FieldErrors::new();
        errors.push("email", "is invalid");
        let err: CabinetError = errors.into_result().unwrap_err().into();
        assert!(err.is_validation());
    }

    #[test]
    fn test_email_shape() {
        assert!(looks_like_email("dr.house@clinic.ma"));
        assert!(!looks_like_email("nope"));
        assert!(!looks_like_email("@clinic.ma"));
        assert!(!looks_like_email("a@b"));
    }
}
