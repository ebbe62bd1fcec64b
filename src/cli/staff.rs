//! Doctor and receptionist CLI commands

use clap::Subcommand;

use super::set_if;
use crate::display::{format_doctor_list, format_receptionist_list};
use crate::display::or_dash;
use crate::error::CabinetResult;
use crate::models::{Doctor, Receptionist};
use crate::services::{Backend, StaffService};

/// Doctor subcommands
#[derive(Subcommand)]
pub enum DoctorCommands {
    /// List doctors
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        /// Only doctors not on leave
        #[arg(long)]
        available: bool,
    },
    /// Show a doctor
    Show { id: String },
    /// Add a doctor
    Add {
        name: String,
        #[arg(long)]
        specialization: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Edit a doctor
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        specialization: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Put a doctor on leave
    Leave { id: String },
    /// Bring a doctor back from leave
    Return { id: String },
    /// Delete a doctor
    Delete { id: String },
}

/// Receptionist subcommands
#[derive(Subcommand)]
pub enum ReceptionistCommands {
    /// List receptionists
    List {
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Add a receptionist
    Add {
        name: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Edit a receptionist
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Delete a receptionist
    Delete { id: String },
}

fn print_doctor(doctor: &Doctor) {
    println!("{}", doctor);
    println!("  ID:       {}", or_dash(doctor.doctor_id.as_ref().map(|id| id.as_str())));
    println!("  Phone:    {}", or_dash(doctor.person.phone.as_deref()));
    println!("  Email:    {}", or_dash(doctor.person.email.as_deref()));
    println!(
        "  Status:   {}",
        if doctor.is_available() { "Available" } else { "On leave" }
    );
}

/// Handle a doctor command
pub fn handle_doctor_command(backend: &Backend, cmd: DoctorCommands) -> CabinetResult<()> {
    let service = StaffService::new(backend);

    match cmd {
        DoctorCommands::List { search, available } => {
            println!("{}", format_doctor_list(&service.list_doctors(&search, available)?));
        }
        DoctorCommands::Show { id } => print_doctor(&service.doctors().get(&id)?),
        DoctorCommands::Add {
            name,
            specialization,
            phone,
            email,
        } => {
            let mut doctor = Doctor::new(name, specialization);
            doctor.person.phone = phone;
            doctor.person.email = email;
            doctor.person.date_joined = Some(chrono::Local::now().date_naive());
            println!("{}", service.doctors().create(&doctor)?);
        }
        DoctorCommands::Update {
            id,
            name,
            specialization,
            phone,
            email,
        } => {
            let (doctor, message) = service.doctors().modify(&id, |d| {
                set_if(&mut d.person.name, name);
                set_if(&mut d.specialization, specialization);
                if phone.is_some() {
                    d.person.phone = phone;
                }
                if email.is_some() {
                    d.person.email = email;
                }
                Ok(())
            })?;
            println!("{}", message);
            print_doctor(&doctor);
        }
        DoctorCommands::Leave { id } => {
            let doctor = service.set_on_leave(&id, true)?;
            println!("{} is now on leave", doctor);
        }
        DoctorCommands::Return { id } => {
            let doctor = service.set_on_leave(&id, false)?;
            println!("{} is available again", doctor);
        }
        DoctorCommands::Delete { id } => println!("{}", service.doctors().delete(&id)?),
    }

    Ok(())
}

/// Handle a receptionist command
pub fn handle_receptionist_command(
    backend: &Backend,
    cmd: ReceptionistCommands,
) -> CabinetResult<()> {
    let service = StaffService::new(backend);

    match cmd {
        ReceptionistCommands::List { search } => {
            println!("{}", format_receptionist_list(&service.list_receptionists(&search)?));
        }
        ReceptionistCommands::Add { name, phone, email } => {
            let mut receptionist = Receptionist::new(name);
            receptionist.person.phone = phone;
            receptionist.person.email = email;
            receptionist.person.date_joined = Some(chrono::Local::now().date_naive());
            println!("{}", service.receptionists().create(&receptionist)?);
        }
        ReceptionistCommands::Update {
            id,
            name,
            phone,
            email,
        } => {
            let (_, message) = service.receptionists().modify(&id, |r| {
                set_if(&mut r.person.name, name);
                if phone.is_some() {
                    r.person.phone = phone;
                }
                if email.is_some() {
                    r.person.email = email;
                }
                Ok(())
            })?;
            println!("{}", message);
        }
        ReceptionistCommands::Delete { id } => {
            println!("{}", service.receptionists().delete(&id)?)
        }
    }

    Ok(())
}
