use anyhow::Result;
use clap::{Parser, Subcommand};

use cabinet_cli::cli::{
    handle_appointment_command, handle_audit, handle_billing_command, handle_config_command,
    handle_doctor_command, handle_export_command, handle_invoice_command, handle_login,
    handle_logout, handle_patient_command, handle_product_command, handle_receptionist_command,
    handle_report_command, handle_service_command, handle_whoami, AppointmentCommands,
    BillingCommands, ConfigCommands, DoctorCommands, ExportCommands, InvoiceCommands,
    PatientCommands, ProductCommands, ReceptionistCommands, ReportCommands, ServiceCommands,
};
use cabinet_cli::config::{CabinetPaths, Settings};
use cabinet_cli::logging;
use cabinet_cli::services::Backend;

#[derive(Parser)]
#[command(
    name = "cabinet",
    version,
    about = "Terminal administration client for a medical office",
    long_about = "cabinet manages patients, staff, services, products, appointments \
                  and invoices of a medical office through its REST backend, from \
                  the command line or an interactive terminal UI."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the interactive TUI
    #[command(alias = "ui")]
    Tui,

    /// Sign in to the backend
    Login {
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Patient records
    #[command(subcommand)]
    Patient(PatientCommands),

    /// Doctors on the roster
    #[command(subcommand)]
    Doctor(DoctorCommands),

    /// Receptionists on the roster
    #[command(subcommand)]
    Receptionist(ReceptionistCommands),

    /// Billable services
    #[command(subcommand)]
    Service(ServiceCommands),

    /// Stocked products
    #[command(subcommand)]
    Product(ProductCommands),

    /// Appointments
    #[command(subcommand, alias = "appt")]
    Appointment(AppointmentCommands),

    /// Invoices and payments
    #[command(subcommand)]
    Invoice(InvoiceCommands),

    /// Reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export invoices to CSV, JSON or YAML
    #[command(subcommand)]
    Export(ExportCommands),

    /// Offline billing calculators
    #[command(subcommand)]
    Billing(BillingCommands),

    /// Show or change configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Show recent changes made from this machine
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = CabinetPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Tui) => {
            logging::init_file(&paths.log_dir());
            cabinet_cli::tui::run_tui(&paths, &settings)?;
            return Ok(());
        }
        _ => logging::init_stderr(),
    }

    match cli.command {
        None => {
            println!("cabinet - medical office administration");
            println!();
            println!("Run 'cabinet login' to sign in.");
            println!("Run 'cabinet --help' for usage information.");
            println!("Run 'cabinet tui' to launch the interactive interface.");
        }
        Some(Commands::Tui) => {}
        Some(Commands::Login { email }) => handle_login(&paths, &settings, email)?,
        Some(Commands::Logout) => handle_logout(&paths, &settings)?,
        Some(Commands::Whoami) => handle_whoami(&paths, &settings)?,
        Some(Commands::Billing(cmd)) => handle_billing_command(cmd, &settings.currency_symbol)?,
        Some(Commands::Config(cmd)) => handle_config_command(&paths, &mut settings, cmd)?,
        Some(Commands::Audit { limit }) => handle_audit(&paths, limit)?,
        Some(command) => {
            let backend = Backend::connect(&paths, &settings)?;
            match command {
                Commands::Patient(cmd) => handle_patient_command(&backend, cmd)?,
                Commands::Doctor(cmd) => handle_doctor_command(&backend, cmd)?,
                Commands::Receptionist(cmd) => handle_receptionist_command(&backend, cmd)?,
                Commands::Service(cmd) => handle_service_command(&backend, cmd)?,
                Commands::Product(cmd) => handle_product_command(&backend, cmd)?,
                Commands::Appointment(cmd) => handle_appointment_command(&backend, cmd)?,
                Commands::Invoice(cmd) => handle_invoice_command(&backend, cmd)?,
                Commands::Report(cmd) => handle_report_command(&backend, cmd)?,
                Commands::Export(cmd) => handle_export_command(&backend, cmd)?,
                _ => {}
            }
        }
    }

    Ok(())
}
