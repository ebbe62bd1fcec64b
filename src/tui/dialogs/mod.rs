//! Dialog components for the TUI

pub mod confirm;
pub mod help;
pub mod payment;
pub mod pricing;
