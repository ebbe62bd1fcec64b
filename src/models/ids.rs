//! Strongly-typed ID wrappers for all entity types
//!
//! The backend assigns opaque string identifiers. Newtype wrappers keep a
//! patient id from being passed where an invoice id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Macro to generate ID newtype wrappers
macro_rules! define_id {
    ($name:ident, $entity:literal) => {
        #[derive(
            Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a backend-assigned identifier
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Name of the entity this id belongs to
            pub const fn entity() -> &'static str {
                $entity
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if s.is_empty() {
                    return Err(IdParseError($entity));
                }
                if s.contains('/') || s.contains('?') || s.contains('#') {
                    return Err(IdParseError($entity));
                }
                Ok(Self(s.to_string()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(PatientId, "Patient");
define_id!(DoctorId, "Doctor");
define_id!(ReceptionistId, "Receptionist");
define_id!(ServiceId, "Service");
define_id!(ProductId, "Product");
define_id!(AppointmentId, "Appointment");
define_id!(InvoiceId, "Invoice");

/// Rejected identifier (empty, or would break the request path)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdParseError(&'static str);

impl fmt::Display for IdParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {} id", self.0)
    }
}

impl std::error::Error for IdParseError {}
