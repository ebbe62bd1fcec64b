//! Audit log of mutations sent to the backend
//!
//! The backend keeps the records; this log keeps a local trail of what this
//! client asked it to change, one JSON object per line.
//!
//! - `AuditEntry`: one successful create, update, delete or payment with the
//!   acting user and before/after snapshots.
//! - `AuditLogger`: appends entries to `audit.log` and reads them back.
//! - `generate_diff`: field-level summary between two snapshots.
//!
//! ```rust,ignore
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::create(EntityType::Patient, "p-1", Some(name), &patient))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
