//! Dashboard report
//!
//! Office overview: headcounts, today's load, this month's takings, what is
//! still owed and which products need restocking.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::io::Write;

use crate::error::CabinetResult;
use crate::models::{
    Appointment, AppointmentStatus, Doctor, Invoice, Money, Patient, Product,
};
use crate::services::Backend;

/// A product at or below its restock threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockRow {
    pub product_name: String,
    pub quantity: u32,
    pub minimum: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub date: NaiveDate,
    pub total_patients: usize,
    pub appointments_today: usize,
    pub doctors_available: usize,
    pub doctors_on_leave: usize,
    /// Paid amounts of invoices dated in the current month
    pub revenue_this_month: Money,
    /// Remaining balance over appointments that are not cancelled
    pub outstanding: Money,
    pub low_stock: Vec<LowStockRow>,
}

impl DashboardReport {
    /// Fetch everything from the backend and summarize it for `today`
    pub fn generate(backend: &Backend, today: NaiveDate) -> CabinetResult<Self> {
        let api = backend.api();
        let patients: Vec<Patient> = api.list()?;
        let doctors: Vec<Doctor> = api.list()?;
        let appointments: Vec<Appointment> = api.list()?;
        let invoices: Vec<Invoice> = api.list()?;
        let products: Vec<Product> = api.list()?;
        Ok(Self::build(
            today,
            &patients,
            &doctors,
            &appointments,
            &invoices,
            &products,
        ))
    }

    pub fn build(
        today: NaiveDate,
        patients: &[Patient],
        doctors: &[Doctor],
        appointments: &[Appointment],
        invoices: &[Invoice],
        products: &[Product],
    ) -> Self {
        let doctors_available = doctors.iter().filter(|d| d.is_available()).count();

        let revenue_this_month = invoices
            .iter()
            .filter(|i| {
                i.invoice_date
                    .is_some_and(|d| d.year() == today.year() && d.month() == today.month())
            })
            .map(|i| i.paid_amount)
            .sum();

        let outstanding = appointments
            .iter()
            .filter(|a| a.appointment_status != AppointmentStatus::Cancelled)
            .map(Appointment::remaining)
            .sum();

        let mut low_stock: Vec<LowStockRow> = products
            .iter()
            .filter(|p| p.is_low_stock())
            .map(|p| LowStockRow {
                product_name: p.product_name.clone(),
                quantity: p.quantity,
                minimum: p.minimum,
            })
            .collect();
        low_stock.sort_by_key(|r| r.quantity);

        Self {
            date: today,
            total_patients: patients.len(),
            appointments_today: appointments
                .iter()
                .filter(|a| a.date_appointment == Some(today))
                .count(),
            doctors_available,
            doctors_on_leave: doctors.len() - doctors_available,
            revenue_this_month,
            outstanding,
            low_stock,
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, currency: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("Dashboard: {}\n", self.date));
        output.push_str(&"=".repeat(48));
        output.push('\n');
        output.push_str(&format!("{:<28} {:>18}\n", "Patients", self.total_patients));
        output.push_str(&format!(
            "{:<28} {:>18}\n",
            "Appointments today", self.appointments_today
        ));
        output.push_str(&format!(
            "{:<28} {:>18}\n",
            "Doctors available", self.doctors_available
        ));
        output.push_str(&format!(
            "{:<28} {:>18}\n",
            "Doctors on leave", self.doctors_on_leave
        ));
        output.push_str(&format!(
            "{:<28} {:>18}\n",
            "Revenue this month",
            self.revenue_this_month.format_with_symbol(currency)
        ));
        output.push_str(&format!(
            "{:<28} {:>18}\n",
            "Outstanding balance",
            self.outstanding.format_with_symbol(currency)
        ));

        if !self.low_stock.is_empty() {
            output.push_str(&"-".repeat(48));
            output.push_str("\nLow stock\n");
            for row in &self.low_stock {
                output.push_str(&format!(
                    "  {:<30} {:>5} / min {}\n",
                    row.product_name, row.quantity, row.minimum
                ));
            }
        }
        output
    }

    /// Export the headline figures as `metric,value` rows
    pub fn export_csv<W: Write>(&self, writer: W) -> CabinetResult<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["metric", "value"])?;
        let rows = [
            ("date", self.date.to_string()),
            ("total_patients", self.total_patients.to_string()),
            ("appointments_today", self.appointments_today.to_string()),
            ("doctors_available", self.doctors_available.to_string()),
            ("doctors_on_leave", self.doctors_on_leave.to_string()),
            ("revenue_this_month", self.revenue_this_month.to_string()),
            ("outstanding", self.outstanding.to_string()),
            ("low_stock_products", self.low_stock.len().to_string()),
        ];
        for (metric, value) in rows {
            csv.write_record([metric, value.as_str()])?;
        }
        csv.flush()?;
        Ok(())
    }
}
