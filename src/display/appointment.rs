//! Appointment display formatting

use tabled::Tabled;

use super::{or_dash, render_table, yes_no};
use crate::models::Appointment;

#[derive(Tabled)]
struct AppointmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Patient")]
    patient: String,
    #[tabled(rename = "Doctor")]
    doctor: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Payment")]
    payment: String,
    #[tabled(rename = "Total")]
    total: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
}

fn date_text(appt: &Appointment) -> String {
    appt.date_appointment
        .map(|d| d.to_string())
        .unwrap_or_else(|| "-".into())
}

pub fn format_appointment_list(appointments: &[Appointment]) -> String {
    let rows = appointments
        .iter()
        .map(|a| AppointmentRow {
            id: a.id_display(),
            date: date_text(a),
            time: format!("{}-{}", a.start_time, a.end_time),
            patient: or_dash(
                a.patient_name
                    .as_deref()
                    .or(a.patient_id.as_ref().map(|id| id.as_str())),
            ),
            doctor: or_dash(
                a.doctor_name
                    .as_deref()
                    .or(a.doctor_id.as_ref().map(|id| id.as_str())),
            ),
            status: a.appointment_status.to_string(),
            payment: a.payment_status.to_string(),
            total: a.total_amount.to_string(),
            remaining: a.remaining().to_string(),
        })
        .collect();
    render_table(rows, "No appointments found.")
}

pub fn format_appointment_details(appt: &Appointment, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Appointment: {}\n", appt.id_display()));
    output.push_str(&format!(
        "  Patient:     {}\n",
        appt.patient_name
            .clone()
            .or_else(|| appt.patient_id.as_ref().map(|id| id.to_string()))
            .unwrap_or_else(|| "-".into())
    ));
    output.push_str(&format!(
        "  Doctor:      {}\n",
        appt.doctor_name
            .clone()
            .or_else(|| appt.doctor_id.as_ref().map(|id| id.to_string()))
            .unwrap_or_else(|| "-".into())
    ));
    output.push_str(&format!(
        "  When:        {} {}-{}\n",
        date_text(appt),
        appt.start_time,
        appt.end_time
    ));
    output.push_str(&format!("  Status:      {}\n", appt.appointment_status));
    if !appt.description.is_empty() {
        output.push_str(&format!("  Notes:       {}\n", appt.description));
    }

    if !appt.services.is_empty() {
        output.push_str("\n  Services:\n");
        for service in &appt.services {
            output.push_str(&format!(
                "    {:<30} {:>12}\n",
                service.service_name,
                service.price.to_string()
            ));
        }
    }

    output.push('\n');
    output.push_str(&format!(
        "  Total:       {}{}\n",
        appt.total_amount.format_with_symbol(currency),
        if appt.is_custom_price { " (custom)" } else { "" }
    ));
    output.push_str(&format!("  Paid:        {}\n", appt.paid_amount.format_with_symbol(currency)));
    output.push_str(&format!("  Remaining:   {}\n", appt.remaining().format_with_symbol(currency)));
    output.push_str(&format!("  Payment:     {}\n", appt.payment_status));
    output.push_str(&format!("  Related:     {}\n", yes_no(appt.is_related)));

    if !appt.invoices.is_empty() {
        output.push_str(&format!("\n  Invoices: {}\n", appt.invoices.len()));
    }

    output
}
