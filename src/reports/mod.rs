//! Reports module for cabinet-cli

pub mod dashboard;

pub use dashboard::{DashboardReport, LowStockRow};
