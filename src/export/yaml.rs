//! YAML export of invoices

use std::io::Write;

use super::json::InvoiceExport;
use crate::error::CabinetResult;
use crate::models::Invoice;

/// Export invoices as YAML, preceded by a comment header
pub fn export_invoices_yaml<W: Write>(invoices: Vec<Invoice>, mut writer: W) -> CabinetResult<()> {
    let export = InvoiceExport::new(invoices);

    writeln!(writer, "# cabinet-cli invoice export")?;
    writeln!(writer, "# Generated: {}", export.exported_at)?;
    writeln!(writer, "# App Version: {}", export.app_version)?;
    writeln!(writer)?;

    serde_yaml::to_writer(writer, &export)?;
    Ok(())
}

/// Export a single invoice as YAML
pub fn export_invoice_yaml<W: Write>(invoice: &Invoice, writer: W) -> CabinetResult<()> {
    serde_yaml::to_writer(writer, invoice)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PaymentMethod};

    #[test]
    fn test_yaml_export_header() {
        let mut out = Vec::new();
        export_invoices_yaml(vec![Invoice::default()], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("# cabinet-cli invoice export"));
        assert!(text.contains("schema_version: 1.0.0"));
    }

    #[test]
    fn test_single_invoice() {
        let invoice = Invoice {
            invoice_id: Some("i7".into()),
            total_amount: Money::from_cents(12050),
            payment_type: Some(PaymentMethod::BankTransfer),
            ..Invoice::default()
        };
        let mut out = Vec::new();
        export_invoice_yaml(&invoice, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("invoiceId: i7"));
        assert!(text.contains("totalAmount: 120.5"));
        assert!(text.contains("paymentType: BANK_TRANSFER"));
    }
}
