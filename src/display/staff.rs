//! Staff display formatting

use tabled::Tabled;

use super::{or_dash, render_table};
use crate::models::{Doctor, Receptionist};

#[derive(Tabled)]
struct DoctorRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Specialization")]
    specialization: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

#[derive(Tabled)]
struct ReceptionistRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Phone")]
    phone: String,
}

pub fn format_doctor_list(doctors: &[Doctor]) -> String {
    let rows = doctors
        .iter()
        .map(|d| DoctorRow {
            id: or_dash(d.doctor_id.as_ref().map(|id| id.as_str())),
            name: d.name().to_string(),
            specialization: d.specialization.clone(),
            phone: or_dash(d.person.phone.as_deref()),
            status: if d.is_available() { "Available" } else { "On leave" },
        })
        .collect();
    render_table(rows, "No doctors found.")
}

pub fn format_receptionist_list(receptionists: &[Receptionist]) -> String {
    let rows = receptionists
        .iter()
        .map(|r| ReceptionistRow {
            id: or_dash(r.receptionist_id.as_ref().map(|id| id.as_str())),
            name: r.name().to_string(),
            email: or_dash(r.person.email.as_deref()),
            phone: or_dash(r.person.phone.as_deref()),
        })
        .collect();
    render_table(rows, "No receptionists found.")
}
