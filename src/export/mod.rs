//! Export module for cabinet-cli
//!
//! Writes invoice data in three formats:
//! - CSV: one row per invoice (spreadsheet-compatible)
//! - JSON: versioned document with summary metadata
//! - YAML: the same document, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_invoices_csv;
pub use json::{export_invoice_json, export_invoices_json, InvoiceExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_invoice_yaml, export_invoices_yaml};

use clap::ValueEnum;

/// Output format for `cabinet export`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
    Yaml,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Yaml => "yaml",
        }
    }
}
