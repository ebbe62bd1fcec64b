//! Display formatting for terminal output
//!
//! List views render through `tabled`; detail views are aligned key/value
//! blocks.

pub mod appointment;
pub mod catalog;
pub mod invoice;
pub mod patient;
pub mod staff;

pub use appointment::{format_appointment_details, format_appointment_list};
pub use catalog::{format_product_list, format_service_list};
pub use invoice::{format_invoice_details, format_invoice_list};
pub use patient::{format_patient_details, format_patient_list};
pub use staff::{format_doctor_list, format_receptionist_list};

use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Render rows as a table, or `empty` when there are none
pub fn render_table<T: Tabled>(rows: Vec<T>, empty: &str) -> String {
    if rows.is_empty() {
        return empty.to_string();
    }
    Table::new(rows).with(Style::psql()).to_string()
}

/// Text of an optional field, "-" when missing or blank
pub fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

pub(crate) fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}
