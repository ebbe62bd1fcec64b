//! Patient CLI commands

use clap::Subcommand;

use super::set_if;
use crate::display::{format_appointment_list, format_invoice_list, format_patient_details, format_patient_list};
use crate::error::{CabinetError, CabinetResult};
use crate::models::Patient;
use crate::services::{Backend, PatientService, PatientSort};

/// Patient subcommands
#[derive(Subcommand)]
pub enum PatientCommands {
    /// List patients
    List {
        /// Filter by name, CIN, phone or email
        #[arg(short, long, default_value = "")]
        search: String,
        /// Sort column
        #[arg(long, value_enum, default_value = "name")]
        sort: PatientSort,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },
    /// Show a patient by ID or CIN
    Show { patient: String },
    /// Register a new patient
    Add {
        name: String,
        /// National identity card number
        #[arg(long)]
        cin: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        insurance: Option<String>,
        #[arg(long)]
        disease: Option<String>,
    },
    /// Edit a patient
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        cin: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        age: Option<u32>,
        #[arg(long)]
        insurance: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        disease: Option<String>,
        /// Append an entry to the medical history
        #[arg(long)]
        history: Option<String>,
    },
    /// Delete a patient
    Delete { id: String },
    /// Appointments of a patient (ID or CIN)
    Appointments { patient: String },
    /// Invoices of a patient (ID or CIN)
    Invoices { patient: String },
}

/// Handle a patient command
pub fn handle_patient_command(backend: &Backend, cmd: PatientCommands) -> CabinetResult<()> {
    let service = PatientService::new(backend);

    match cmd {
        PatientCommands::List { search, sort, desc } => {
            let patients = service.list(&search, sort, desc)?;
            println!("{}", format_patient_list(&patients));
        }

        PatientCommands::Show { patient } => {
            print!("{}", format_patient_details(&service.find(&patient)?));
        }

        PatientCommands::Add {
            name,
            cin,
            phone,
            email,
            gender,
            age,
            insurance,
            disease,
        } => {
            let mut patient = Patient::new(name, cin);
            patient.person.phone = phone;
            patient.person.email = email;
            patient.person.gender = gender;
            patient.person.age = age;
            patient.person.date_joined = Some(chrono::Local::now().date_naive());
            patient.insurance = insurance;
            patient.disease = disease;

            let message = service.create(&patient)?;
            println!("{}", message);
        }

        PatientCommands::Update {
            id,
            name,
            cin,
            phone,
            email,
            age,
            insurance,
            status,
            disease,
            history,
        } => {
            let (patient, message) = service.modify(&id, |p| {
                set_if(&mut p.person.name, name);
                set_if(&mut p.cin, cin);
                if phone.is_some() {
                    p.person.phone = phone;
                }
                if email.is_some() {
                    p.person.email = email;
                }
                if age.is_some() {
                    p.person.age = age;
                }
                if insurance.is_some() {
                    p.insurance = insurance;
                }
                if status.is_some() {
                    p.status = status;
                }
                if disease.is_some() {
                    p.disease = disease;
                }
                if let Some(entry) = history {
                    p.medical_history.push(entry);
                }
                Ok(())
            })?;
            println!("{}", message);
            print!("{}", format_patient_details(&patient));
        }

        PatientCommands::Delete { id } => {
            println!("{}", service.delete(&id)?);
        }

        PatientCommands::Appointments { patient } => {
            let found = service.find(&patient)?;
            let id = found
                .patient_id
                .ok_or_else(|| CabinetError::patient_not_found(&patient))?;
            println!("{}", format_appointment_list(&service.appointments(&id)?));
        }

        PatientCommands::Invoices { patient } => {
            let found = service.find(&patient)?;
            let id = found
                .patient_id
                .ok_or_else(|| CabinetError::patient_not_found(&patient))?;
            println!("{}", format_invoice_list(&service.invoices(&id)?));
        }
    }

    Ok(())
}
