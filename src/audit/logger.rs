//! Append-only JSONL audit logger

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::warn;

use super::entry::{AuditEntry, EntityType};
use crate::error::{CabinetError, CabinetResult};

/// Writes audit entries to `audit.log`, one JSON object per line
#[derive(Debug, Clone)]
pub struct AuditLogger {
    log_path: PathBuf,
}

impl AuditLogger {
    pub fn new(log_path: PathBuf) -> Self {
        Self { log_path }
    }

    /// Append one entry and flush it
    pub fn log(&self, entry: &AuditEntry) -> CabinetResult<()> {
        if let Some(parent) = self.log_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| CabinetError::Io(format!("Failed to create audit directory: {}", e)))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| CabinetError::Io(format!("Failed to open audit log: {}", e)))?;

        let json = serde_json::to_string(entry)
            .map_err(|e| CabinetError::Json(format!("Failed to serialize audit entry: {}", e)))?;

        writeln!(file, "{}", json)
            .and_then(|_| file.flush())
            .map_err(|e| CabinetError::Io(format!("Failed to write audit entry: {}", e)))?;

        Ok(())
    }

    /// All entries, oldest first
    ///
    /// Lines that fail to parse are skipped with a warning.
    pub fn read_all(&self) -> CabinetResult<Vec<AuditEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.log_path)
            .map_err(|e| CabinetError::Io(format!("Failed to open audit log: {}", e)))?;

        let mut entries = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.map_err(|e| {
                CabinetError::Io(format!("Failed to read audit log line {}: {}", index + 1, e))
            })?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AuditEntry>(&line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(line = index + 1, error = %e, "skipping malformed audit entry"),
            }
        }

        Ok(entries)
    }

    /// The last `count` entries, oldest first
    pub fn read_recent(&self, count: usize) -> CabinetResult<Vec<AuditEntry>> {
        let mut entries = self.read_all()?;
        let start = entries.len().saturating_sub(count);
        Ok(entries.split_off(start))
    }

    /// Entries about one record
    pub fn read_for_entity(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> CabinetResult<Vec<AuditEntry>> {
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|e| e.entity_type == entity_type && e.entity_id == entity_id)
            .collect())
    }

    pub fn entry_count(&self) -> CabinetResult<usize> {
        Ok(self.read_all()?.len())
    }

    pub fn path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::entry::Operation;
    use serde_json::json;
    use tempfile::TempDir;

    fn logger() -> (AuditLogger, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let logger = AuditLogger::new(temp_dir.path().join("nested").join("audit.log"));
        (logger, temp_dir)
    }

    fn created(id: &str) -> AuditEntry {
        AuditEntry::create(EntityType::Patient, id, None, &json!({"name": id}))
    }

    #[test]
    fn test_log_and_read() {
        let (logger, _temp) = logger();
        logger.log(&created("p1")).unwrap();

        let entries = logger.read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[0].entity_type, EntityType::Patient);
    }

    #[test]
    fn test_read_recent_keeps_order() {
        let (logger, _temp) = logger();
        for i in 0..6 {
            logger.log(&created(&format!("p{}", i))).unwrap();
        }
        let recent = logger.read_recent(2).unwrap();
        let ids: Vec<&str> = recent.iter().map(|e| e.entity_id.as_str()).collect();
        assert_eq!(ids, vec!["p4", "p5"]);
        assert_eq!(logger.read_recent(50).unwrap().len(), 6);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let (logger, _temp) = logger();
        assert_eq!(logger.entry_count().unwrap(), 0);
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let (logger, _temp) = logger();
        logger.log(&created("p1")).unwrap();
        let mut file = OpenOptions::new().append(true).open(logger.path()).unwrap();
        writeln!(file, "{{not json").unwrap();
        logger.log(&created("p2")).unwrap();

        assert_eq!(logger.entry_count().unwrap(), 2);
    }

    #[test]
    fn test_read_for_entity() {
        let (logger, _temp) = logger();
        logger.log(&created("p1")).unwrap();
        logger.log(&created("p2")).unwrap();
        logger
            .log(&AuditEntry::delete(EntityType::Patient, "p1", None, &json!({})))
            .unwrap();

        let history = logger.read_for_entity(EntityType::Patient, "p1").unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].operation, Operation::Delete);
    }
}
