//! CLI commands for data export

use clap::Subcommand;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{CabinetError, CabinetResult};
use crate::export::{
    export_invoice_json, export_invoice_yaml, export_invoices_csv, export_invoices_json,
    export_invoices_yaml, ExportFormat,
};
use crate::models::PaymentStatus;
use crate::services::{Backend, InvoiceService};

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export invoices
    Invoices {
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,
        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only invoices with this status
        #[arg(long)]
        status: Option<String>,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Export a single invoice (json or yaml)
    Invoice {
        id: String,
        #[arg(short, long, value_enum, default_value = "yaml")]
        format: ExportFormat,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn open_output(output: Option<&Path>) -> CabinetResult<Box<dyn Write>> {
    Ok(match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            Box::new(BufWriter::new(File::create(path)?))
        }
        None => Box::new(io::stdout().lock()),
    })
}

/// Handle export commands
pub fn handle_export_command(backend: &Backend, cmd: ExportCommands) -> CabinetResult<()> {
    let service = InvoiceService::new(backend);

    match cmd {
        ExportCommands::Invoices {
            format,
            output,
            status,
            pretty,
        } => {
            let status = status
                .as_deref()
                .map(|s| {
                    PaymentStatus::parse(s).ok_or_else(|| {
                        CabinetError::Validation(format!("Invalid invoice status '{}'", s))
                    })
                })
                .transpose()?;
            let invoices = service.list("", status)?;
            let count = invoices.len();

            let mut writer = open_output(output.as_deref())?;
            match format {
                ExportFormat::Csv => export_invoices_csv(&invoices, &mut writer)?,
                ExportFormat::Json => export_invoices_json(invoices, &mut writer, pretty)?,
                ExportFormat::Yaml => export_invoices_yaml(invoices, &mut writer)?,
            }
            writer.flush()?;

            if let Some(path) = output {
                println!("Exported {} invoices to {}", count, path.display());
            }
        }

        ExportCommands::Invoice { id, format, output } => {
            let invoice = service.get(&id)?;
            let mut writer = open_output(output.as_deref())?;
            match format {
                ExportFormat::Json => export_invoice_json(&invoice, &mut writer)?,
                ExportFormat::Yaml => export_invoice_yaml(&invoice, &mut writer)?,
                ExportFormat::Csv => export_invoices_csv(std::slice::from_ref(&invoice), &mut writer)?,
            }
            writer.flush()?;

            if let Some(path) = output {
                println!("Exported invoice {} to {}", id, path.display());
            }
        }
    }

    Ok(())
}
