//! Patient display formatting

use tabled::Tabled;

use super::{or_dash, render_table};
use crate::models::Patient;

#[derive(Tabled)]
struct PatientRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "CIN")]
    cin: String,
    #[tabled(rename = "Phone")]
    phone: String,
    #[tabled(rename = "Age")]
    age: String,
    #[tabled(rename = "Insurance")]
    insurance: String,
}

pub fn format_patient_list(patients: &[Patient]) -> String {
    let rows = patients
        .iter()
        .map(|p| PatientRow {
            id: p.id_display(),
            name: p.name().to_string(),
            cin: p.cin.clone(),
            phone: or_dash(p.person.phone.as_deref()),
            age: p.person.age.map(|a| a.to_string()).unwrap_or_else(|| "-".into()),
            insurance: or_dash(p.insurance.as_deref()),
        })
        .collect();
    render_table(rows, "No patients found.")
}

pub fn format_patient_details(patient: &Patient) -> String {
    let person = &patient.person;
    let mut output = String::new();

    output.push_str(&format!("Patient: {}\n", person.name));
    output.push_str(&format!("  ID:          {}\n", patient.id_display()));
    output.push_str(&format!("  CIN:         {}\n", patient.cin));
    output.push_str(&format!("  Gender:      {}\n", or_dash(person.gender.as_deref())));
    output.push_str(&format!(
        "  Age:         {}\n",
        person.age.map(|a| a.to_string()).unwrap_or_else(|| "-".into())
    ));
    output.push_str(&format!("  Phone:       {}\n", or_dash(person.phone.as_deref())));
    output.push_str(&format!("  Email:       {}\n", or_dash(person.email.as_deref())));
    output.push_str(&format!("  Insurance:   {}\n", or_dash(patient.insurance.as_deref())));
    output.push_str(&format!("  Status:      {}\n", or_dash(patient.status.as_deref())));
    if let Some(joined) = person.date_joined {
        output.push_str(&format!("  Joined:      {}\n", joined));
    }
    if let Some(disease) = patient.disease.as_deref().filter(|d| !d.is_empty()) {
        output.push_str(&format!("  Disease:     {}\n", disease));
    }
    if !patient.medical_history.is_empty() {
        output.push_str("\n  Medical history:\n");
        for entry in &patient.medical_history {
            output.push_str(&format!("    - {}\n", entry));
        }
    }
    if !patient.documents.is_empty() {
        output.push_str(&format!("\n  Documents: {}\n", patient.documents.len()));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details() {
        let mut patient = Patient::new("Amina Alaoui", "AB123");
        patient.medical_history = vec!["asthma".into()];
        let text = format_patient_details(&patient);
        assert!(text.starts_with("Patient: Amina Alaoui"));
        assert!(text.contains("CIN:         AB123"));
        assert!(text.contains("- asthma"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_patient_list(&[]), "No patients found.");
    }
}
