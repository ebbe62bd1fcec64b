//! Report CLI commands

use clap::Subcommand;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::error::CabinetResult;
use crate::reports::DashboardReport;
use crate::services::Backend;

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Office overview for today
    Dashboard {
        /// Also write the figures to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

/// Handle a report command
pub fn handle_report_command(backend: &Backend, cmd: ReportCommands) -> CabinetResult<()> {
    match cmd {
        ReportCommands::Dashboard { csv } => {
            let today = chrono::Local::now().date_naive();
            let report = DashboardReport::generate(backend, today)?;
            print!("{}", report.format_terminal(&backend.settings().currency_symbol));

            if let Some(path) = csv {
                let file = File::create(&path)?;
                report.export_csv(BufWriter::new(file))?;
                println!("\nWrote {}", path.display());
            }
        }
    }
    Ok(())
}
