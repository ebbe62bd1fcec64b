//! CSV export of invoices

use std::io::Write;

use crate::error::CabinetResult;
use crate::models::Invoice;

const HEADER: [&str; 10] = [
    "Invoice ID",
    "Date",
    "Patient",
    "Appointment ID",
    "Total",
    "Paid",
    "Remaining",
    "Payment Type",
    "Status",
    "Products",
];

/// Write one row per invoice
pub fn export_invoices_csv<W: Write>(invoices: &[Invoice], writer: W) -> CabinetResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;

    for invoice in invoices {
        let products: Vec<String> = invoice
            .used_products
            .iter()
            .map(|p| format!("{} x{}", p.display_name(), p.quantity))
            .collect();
        csv.write_record([
            invoice.id_display(),
            invoice
                .invoice_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            invoice.patient_name.clone().unwrap_or_default(),
            invoice
                .appointment_id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            invoice.total_amount.to_string(),
            invoice.paid_amount.to_string(),
            invoice.remaining().to_string(),
            invoice
                .payment_type
                .map(|m| m.code().to_string())
                .unwrap_or_default(),
            invoice.invoice_status.to_string(),
            products.join("; "),
        ])?;
    }

    csv.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PaymentMethod, PaymentStatus, ProductId, UsedProduct};

    #[test]
    fn test_invoice_rows() {
        let mut gauze = UsedProduct::new(ProductId::new("g"), 2);
        gauze.product_name = Some("Gauze, sterile".into());
        let invoice = Invoice {
            invoice_id: Some("i1".into()),
            patient_name: Some("Amina".into()),
            total_amount: Money::from_cents(50000),
            paid_amount: Money::from_cents(20000),
            payment_type: Some(PaymentMethod::Card),
            invoice_status: PaymentStatus::PartiallyPaid,
            used_products: vec![gauze],
            ..Invoice::default()
        };

        let mut out = Vec::new();
        export_invoices_csv(&[invoice], &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("Invoice ID,Date,Patient"));
        assert_eq!(
            lines.next().unwrap(),
            "i1,,Amina,,500.00,200.00,300.00,CARD,Partially paid,\"Gauze, sterile x2\""
        );
    }

    #[test]
    fn test_empty_export_has_header() {
        let mut out = Vec::new();
        export_invoices_csv(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }
}
