//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod appointment;
pub mod auth;
pub mod billing;
pub mod catalog;
pub mod config;
pub mod export;
pub mod invoice;
pub mod patient;
pub mod report;
pub mod staff;

pub use appointment::{handle_appointment_command, AppointmentCommands};
pub use auth::{handle_login, handle_logout, handle_whoami};
pub use billing::{handle_billing_command, BillingCommands};
pub use catalog::{handle_product_command, handle_service_command, ProductCommands, ServiceCommands};
pub use config::{handle_audit, handle_config_command, ConfigCommands};
pub use export::{handle_export_command, ExportCommands};
pub use invoice::{handle_invoice_command, InvoiceCommands};
pub use patient::{handle_patient_command, PatientCommands};
pub use report::{handle_report_command, ReportCommands};
pub use staff::{handle_doctor_command, handle_receptionist_command, DoctorCommands, ReceptionistCommands};

use chrono::NaiveDate;

use crate::error::{CabinetError, CabinetResult};
use crate::models::dates::parse_date;
use crate::models::{Money, PaymentMethod};

/// Parse a typed amount, naming the argument on failure
pub(crate) fn parse_money(raw: &str, field: &str) -> CabinetResult<Money> {
    Money::parse(raw).map_err(|_| {
        CabinetError::Validation(format!(
            "Invalid {} '{}'. Use a number like '250' or '250.50'",
            field, raw
        ))
    })
}

pub(crate) fn parse_day(raw: &str) -> CabinetResult<NaiveDate> {
    parse_date(raw).ok_or_else(|| {
        CabinetError::Validation(format!("Invalid date '{}'. Use YYYY-MM-DD", raw))
    })
}

pub(crate) fn parse_method(raw: &str) -> CabinetResult<PaymentMethod> {
    PaymentMethod::parse(raw).ok_or_else(|| {
        CabinetError::Validation(format!(
            "Invalid payment method '{}'. Valid methods: cash, card, bank_transfer",
            raw
        ))
    })
}

/// Replace `target` when a new value was given
pub(crate) fn set_if<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_money("250.5", "price").unwrap(), Money::from_cents(25050));
        assert!(parse_money("abc", "price").unwrap_err().is_validation());
        assert!(parse_day("2025-13-01").is_err());
        assert_eq!(parse_method("card").unwrap(), PaymentMethod::Card);
    }

    #[test]
    fn test_set_if() {
        let mut name = String::from("old");
        set_if(&mut name, None);
        assert_eq!(name, "old");
        set_if(&mut name, Some("new".into()));
        assert_eq!(name, "new");
    }
}
