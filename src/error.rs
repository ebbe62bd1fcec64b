//! Custom error types for cabinet-cli
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for cabinet-cli operations
#[derive(Error, Debug)]
pub enum CabinetError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models and forms
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Transport-level failure (DNS, TLS, connection reset, timeout)
    #[error("HTTP error: {0}")]
    Http(String),

    /// The backend answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The backend rejected our credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Identity provider / session errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// No usable session exists on disk
    #[error("Not logged in. Run 'cabinet login' first.")]
    NotLoggedIn,

    /// Payment could not be submitted
    #[error("Payment error: {0}")]
    Payment(String),

    /// Not enough stock for a used product
    #[error("Insufficient stock for {product}: available {available}, requested {requested}")]
    InsufficientStock {
        product: String,
        available: u32,
        requested: u32,
    },

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// TUI errors
    #[error("TUI error: {0}")]
    Tui(String),
}

impl CabinetError {
    /// Create a "not found" error for patients
    pub fn patient_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Patient",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for appointments
    pub fn appointment_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Appointment",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for invoices
    pub fn invoice_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Invoice",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for catalog services
    pub fn service_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Service",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for products
    pub fn product_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Product",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if re-authenticating could fix this error
    pub fn needs_login(&self) -> bool {
        matches!(self, Self::NotLoggedIn | Self::Unauthorized(_))
    }
}

impl From<std::io::Error> for CabinetError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CabinetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for CabinetError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<csv::Error> for CabinetError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

impl From<reqwest::Error> for CabinetError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Http(format!("request timed out: {}", err))
        } else {
            Self::Http(err.to_string())
        }
    }
}

/// Result type alias for cabinet-cli operations
pub type CabinetResult<T> = Result<T, CabinetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CabinetError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = CabinetError::invoice_not_found("inv-42");
        assert_eq!(err.to_string(), "Invoice not found: inv-42");
        assert!(err.is_not_found());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_api_error_display() {
        let err = CabinetError::Api {
            status: 500,
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "API error (500): boom");
    }

    #[test]
    fn test_insufficient_stock_error() {
        let err = CabinetError::InsufficientStock {
            product: "Gauze".into(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Gauze: available 3, requested 5"
        );
    }

    #[test]
    fn test_needs_login() {
        assert!(CabinetError::NotLoggedIn.needs_login());
        assert!(CabinetError::Unauthorized("expired".into()).needs_login());
        assert!(!CabinetError::Validation("x".into()).needs_login());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CabinetError = io_err.into();
        assert!(matches!(err, CabinetError::Io(_)));
    }
}
