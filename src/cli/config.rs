//! Configuration and audit log commands

use clap::Subcommand;

use crate::audit::AuditLogger;
use crate::config::{CabinetPaths, Settings};
use crate::error::CabinetResult;

/// Config subcommands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show paths and settings
    Show,
    /// Change a setting, e.g. `config set currency_symbol EUR`
    Set { key: String, value: String },
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        "(not set)".to_string()
    } else {
        let tail: String = secret
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        format!("****{}", tail)
    }
}

/// Handle a config command
pub fn handle_config_command(
    paths: &CabinetPaths,
    settings: &mut Settings,
    cmd: ConfigCommands,
) -> CabinetResult<()> {
    match cmd {
        ConfigCommands::Show => {
            println!("cabinet-cli Configuration");
            println!("=========================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!("Log directory:   {}", paths.log_dir().display());
            println!();
            println!("Settings:");
            println!("  api_base_url:           {}", settings.api_base_url);
            println!("  identity_url:           {}", settings.identity_url);
            println!("  token_url:              {}", settings.token_url);
            println!("  api_key:                {}", mask(&settings.api_key));
            println!("  request_timeout_secs:   {}", settings.request_timeout_secs);
            println!("  currency_symbol:        {}", settings.currency_symbol);
            println!("  date_format:            {}", settings.date_format);
            println!(
                "  default_payment_method: {}",
                settings.default_payment_method.code().to_lowercase()
            );
            println!("  low_stock_warning:      {}", settings.low_stock_warning);
        }
        ConfigCommands::Set { key, value } => {
            settings.set(&key, &value)?;
            settings.save(paths)?;
            println!("Set {} = {}", key, if key == "api_key" { mask(&value) } else { value });
        }
    }
    Ok(())
}

/// Print the most recent audit entries, newest first
pub fn handle_audit(paths: &CabinetPaths, limit: usize) -> CabinetResult<()> {
    let logger = AuditLogger::new(paths.audit_log());
    let entries = logger.read_recent(limit)?;
    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }
    for entry in entries.iter().rev() {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask() {
        assert_eq!(mask(""), "(not set)");
        assert_eq!(mask("AIzaSyABCDEF1234"), "****1234");
        assert_eq!(mask("ab"), "****ab");
    }
}
