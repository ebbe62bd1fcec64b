//! Logging setup
//!
//! The filter comes from `CABINET_LOG` (for example `cabinet_cli=debug`) and
//! defaults to `warn`. Command-line runs log to stderr; the TUI owns the
//! terminal, so it logs to a daily file in the log directory instead.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "CABINET_LOG";

fn filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Log to stderr
pub fn init_stderr() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Log to a daily-rolled file under `log_dir`
///
/// Falls back to discarding output when the directory cannot be created.
pub fn init_file(log_dir: &Path) {
    if std::fs::create_dir_all(log_dir).is_err() {
        return;
    }
    let appender = tracing_appender::rolling::daily(log_dir, "cabinet.log");
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_ansi(false)
        .with_writer(appender)
        .try_init();
}
