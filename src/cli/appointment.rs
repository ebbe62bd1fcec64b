//! Appointment CLI commands

use clap::Subcommand;

use super::{parse_day, parse_money};
use crate::display::{format_appointment_details, format_appointment_list, format_invoice_list};
use crate::error::{CabinetError, CabinetResult};
use crate::models::{AppointmentStatus, PaymentStatus, ServiceId};
use crate::services::{
    AppointmentDraft, AppointmentFilter, AppointmentService, Backend, PriceChange,
};

/// Appointment subcommands
#[derive(Subcommand)]
pub enum AppointmentCommands {
    /// List appointments
    List {
        /// Only this day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<String>,
        /// Only today
        #[arg(long, conflicts_with = "date")]
        today: bool,
        /// pending, scheduled, completed or cancelled
        #[arg(long)]
        status: Option<String>,
        /// pending, partially_paid, paid or cancelled
        #[arg(long)]
        payment: Option<String>,
        #[arg(long)]
        doctor: Option<String>,
        #[arg(long)]
        patient: Option<String>,
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Show an appointment
    Show { id: String },
    /// Book an appointment
    Add {
        /// Patient ID
        #[arg(long)]
        patient: String,
        /// Doctor ID
        #[arg(long)]
        doctor: String,
        /// Day (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        /// Start time (HH:MM)
        #[arg(long)]
        start: String,
        /// End time (HH:MM)
        #[arg(long)]
        end: String,
        /// Service IDs, comma separated
        #[arg(short, long, value_delimiter = ',')]
        services: Vec<String>,
        /// Custom total replacing the sum of the services
        #[arg(long)]
        total: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Change services or price of an appointment
    Reprice {
        id: String,
        /// Replace the services (comma separated IDs)
        #[arg(short, long, value_delimiter = ',')]
        services: Option<Vec<String>>,
        /// Set a custom total
        #[arg(long, conflicts_with = "computed")]
        total: Option<String>,
        /// Drop the custom total and sum the services
        #[arg(long)]
        computed: bool,
    },
    /// Change the scheduling status
    Status { id: String, status: String },
    /// Mark an appointment as fully paid
    MarkPaid { id: String },
    /// Generate an invoice for an appointment
    Invoice { id: String },
    /// List invoices of an appointment
    Invoices { id: String },
    /// Delete an appointment
    Delete { id: String },
}

fn parse_status(raw: &str) -> CabinetResult<AppointmentStatus> {
    AppointmentStatus::parse(raw).ok_or_else(|| {
        CabinetError::Validation(format!(
            "Invalid status '{}'. Valid: pending, scheduled, completed, cancelled",
            raw
        ))
    })
}

fn service_ids(ids: Vec<String>) -> Vec<ServiceId> {
    ids.into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(ServiceId::from)
        .collect()
}

/// Handle an appointment command
pub fn handle_appointment_command(
    backend: &Backend,
    cmd: AppointmentCommands,
) -> CabinetResult<()> {
    let service = AppointmentService::new(backend);
    let currency = backend.settings().currency_symbol.as_str();

    match cmd {
        AppointmentCommands::List {
            date,
            today,
            status,
            payment,
            doctor,
            patient,
            search,
        } => {
            let date = if today {
                Some(chrono::Local::now().date_naive())
            } else {
                date.as_deref().map(parse_day).transpose()?
            };
            let payment = payment
                .as_deref()
                .map(|p| {
                    PaymentStatus::parse(p).ok_or_else(|| {
                        CabinetError::Validation(format!("Invalid payment status '{}'", p))
                    })
                })
                .transpose()?;
            let filter = AppointmentFilter {
                date,
                status: status.as_deref().map(parse_status).transpose()?,
                payment,
                doctor: doctor.map(Into::into),
                patient: patient.map(Into::into),
                query: search,
            };
            println!("{}", format_appointment_list(&service.list(&filter)?));
        }

        AppointmentCommands::Show { id } => {
            print!("{}", format_appointment_details(&service.get(&id)?, currency));
        }

        AppointmentCommands::Add {
            patient,
            doctor,
            date,
            start,
            end,
            services,
            total,
            description,
        } => {
            let draft = AppointmentDraft {
                patient: patient.into(),
                doctor: doctor.into(),
                date: parse_day(&date)?,
                start,
                end,
                service_ids: service_ids(services),
                custom_total: total.map(|t| parse_money(&t, "total")).transpose()?,
                description,
            };
            let (appointment, message) = service.create(&draft)?;
            println!("{}", message);
            println!(
                "  Total: {}{}",
                appointment.total_amount.format_with_symbol(currency),
                if appointment.is_custom_price { " (custom)" } else { "" }
            );
        }

        AppointmentCommands::Reprice {
            id,
            services,
            total,
            computed,
        } => {
            let price = match (total, computed) {
                (Some(total), _) => Some(PriceChange::Custom(parse_money(&total, "total")?)),
                (None, true) => Some(PriceChange::Computed),
                (None, false) => None,
            };
            let ids = services.map(service_ids);
            if ids.is_none() && price.is_none() {
                println!("No changes specified. Use --services, --total or --computed.");
                return Ok(());
            }
            let (appointment, message) = service.reprice(&id, ids.as_deref(), price)?;
            println!("{}", message);
            print!("{}", format_appointment_details(&appointment, currency));
        }

        AppointmentCommands::Status { id, status } => {
            let appointment = service.set_status(&id, parse_status(&status)?)?;
            println!(
                "Appointment {} is now {}",
                appointment.id_display(),
                appointment.appointment_status
            );
        }

        AppointmentCommands::MarkPaid { id } => {
            let appointment = service.mark_paid(&id.as_str().into())?;
            println!("Appointment {} marked {}", id, appointment.payment_status);
        }

        AppointmentCommands::Invoice { id } => {
            let invoice = service.generate_invoice(&id.as_str().into())?;
            println!("Generated invoice {}", invoice.id_display());
            println!(
                "  Total: {}",
                invoice.total_amount.format_with_symbol(currency)
            );
        }

        AppointmentCommands::Invoices { id } => {
            println!("{}", format_invoice_list(&service.invoices(&id.as_str().into())?));
        }

        AppointmentCommands::Delete { id } => println!("{}", service.records().delete(&id)?),
    }

    Ok(())
}
