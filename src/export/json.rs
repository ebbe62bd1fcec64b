//! JSON export of invoices with schema versioning

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{CabinetError, CabinetResult};
use crate::models::{Invoice, Money, PaymentStatus};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Invoice export document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceExport {
    /// Schema version for compatibility checking
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    pub invoices: Vec<Invoice>,

    pub metadata: ExportMetadata,
}

/// Totals over the exported invoices
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub invoice_count: usize,
    pub paid_count: usize,
    pub total_billed: Money,
    pub total_paid: Money,
    pub total_remaining: Money,
    pub earliest_invoice: Option<String>,
    pub latest_invoice: Option<String>,
}

impl InvoiceExport {
    pub fn new(invoices: Vec<Invoice>) -> Self {
        let dates = invoices.iter().filter_map(|i| i.invoice_date);
        let metadata = ExportMetadata {
            invoice_count: invoices.len(),
            paid_count: invoices
                .iter()
                .filter(|i| i.invoice_status == PaymentStatus::Paid)
                .count(),
            total_billed: invoices.iter().map(|i| i.total_amount).sum(),
            total_paid: invoices.iter().map(|i| i.paid_amount).sum(),
            total_remaining: invoices.iter().map(Invoice::remaining).sum(),
            earliest_invoice: dates.clone().min().map(|d| d.to_string()),
            latest_invoice: dates.max().map(|d| d.to_string()),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            invoices,
            metadata,
        }
    }
}

/// Export invoices as a versioned JSON document
pub fn export_invoices_json<W: Write>(
    invoices: Vec<Invoice>,
    writer: W,
    pretty: bool,
) -> CabinetResult<()> {
    let export = InvoiceExport::new(invoices);
    if pretty {
        serde_json::to_writer_pretty(writer, &export)
    } else {
        serde_json::to_writer(writer, &export)
    }
    .map_err(|e| CabinetError::Export(e.to_string()))
}

/// Export a single invoice as JSON
pub fn export_invoice_json<W: Write>(invoice: &Invoice, writer: W) -> CabinetResult<()> {
    serde_json::to_writer_pretty(writer, invoice).map_err(|e| CabinetError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn invoice(day: u32, total: i64, paid: i64, status: PaymentStatus) -> Invoice {
        Invoice {
            invoice_date: NaiveDate::from_ymd_opt(2025, 6, day),
            total_amount: Money::from_cents(total),
            paid_amount: Money::from_cents(paid),
            invoice_status: status,
            ..Invoice::default()
        }
    }

    #[test]
    fn test_metadata() {
        let export = InvoiceExport::new(vec![
            invoice(3, 50000, 20000, PaymentStatus::PartiallyPaid),
            invoice(1, 10000, 10000, PaymentStatus::Paid),
        ]);
        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.metadata.invoice_count, 2);
        assert_eq!(export.metadata.paid_count, 1);
        assert_eq!(export.metadata.total_remaining, Money::from_cents(30000));
        assert_eq!(export.metadata.earliest_invoice.as_deref(), Some("2025-06-01"));
        assert_eq!(export.metadata.latest_invoice.as_deref(), Some("2025-06-03"));
    }

    #[test]
    fn test_document_shape() {
        let mut out = Vec::new();
        export_invoices_json(vec![invoice(1, 100, 0, PaymentStatus::Pending)], &mut out, false)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["schema_version"], EXPORT_SCHEMA_VERSION);
        assert!(value["exported_at"].is_string());
        assert_eq!(value["invoices"][0]["totalAmount"], 1.0);
    }
}
