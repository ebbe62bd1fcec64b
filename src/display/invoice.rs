//! Invoice display formatting

use tabled::Tabled;

use super::{or_dash, render_table};
use crate::models::Invoice;

#[derive(Tabled)]
struct InvoiceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Patient")]
    patient: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Paid")]
    paid: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Products")]
    products: String,
}

pub fn format_invoice_list(invoices: &[Invoice]) -> String {
    let rows = invoices
        .iter()
        .map(|i| InvoiceRow {
            id: i.id_display(),
            date: i
                .invoice_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".into()),
            patient: or_dash(i.patient_name.as_deref()),
            total: i.total_amount.to_string(),
            paid: i.paid_amount.to_string(),
            remaining: i.remaining().to_string(),
            method: i
                .payment_type
                .map(|m| m.to_string())
                .unwrap_or_else(|| "-".into()),
            status: i.invoice_status.to_string(),
            products: i.products_summary(),
        })
        .collect();
    render_table(rows, "No invoices found.")
}

pub fn format_invoice_details(invoice: &Invoice, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", invoice.id_display()));
    output.push_str(&format!("  Patient:      {}\n", or_dash(invoice.patient_name.as_deref())));
    output.push_str(&format!(
        "  Appointment:  {}{}\n",
        or_dash(invoice.appointment_id.as_ref().map(|id| id.as_str())),
        invoice
            .appointment_date
            .map(|d| format!(" ({})", d))
            .unwrap_or_default()
    ));
    if let Some(date) = invoice.invoice_date {
        output.push_str(&format!("  Issued:       {}\n", date));
    }
    output.push_str(&format!("  Status:       {}\n", invoice.invoice_status));
    output.push('\n');
    output.push_str(&format!(
        "  Total:        {}\n",
        invoice.total_amount.format_with_symbol(currency)
    ));
    output.push_str(&format!(
        "  Paid:         {}\n",
        invoice.paid_amount.format_with_symbol(currency)
    ));
    output.push_str(&format!(
        "  Remaining:    {}\n",
        invoice.remaining().format_with_symbol(currency)
    ));
    if let Some(method) = invoice.payment_type {
        output.push_str(&format!("  Method:       {}\n", method));
    }

    if !invoice.used_products.is_empty() {
        output.push_str("\n  Used products:\n");
        for product in &invoice.used_products {
            output.push_str(&format!(
                "    {:<30} x{}\n",
                product.display_name(),
                product.quantity
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, PaymentMethod, PaymentStatus};

    #[test]
    fn test_details() {
        let invoice = Invoice {
            invoice_id: Some("i1".into()),
            total_amount: Money::from_cents(50000),
            paid_amount: Money::from_cents(20000),
            payment_type: Some(PaymentMethod::Cash),
            invoice_status: PaymentStatus::PartiallyPaid,
            ..Invoice::default()
        };
        let text = format_invoice_details(&invoice, "MAD");
        assert!(text.contains("Remaining:    300.00 MAD"));
        assert!(text.contains("Status:       Partially paid"));
        assert!(text.contains("Method:       Cash"));
    }
}
