// src/mail/run_log.rs
//! Append-only log of one dispatch run

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::Level;

use crate::core::FsOps;

pub struct RunLog {
    path: PathBuf,
    file: File,
}

impl RunLog {
    /// Create `<dir>/<UTC %Y%m%d_%H%M%S>_email.log`
    pub fn create(dir: &Path, started: DateTime<Utc>) -> Result<Self> {
        FsOps::ensure_dir_exists(dir)?;
        let path = dir.join(format!("{}_email.log", started.format("%Y%m%d_%H%M%S")));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open run log {}", path.display()))?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn record(&mut self, level: Level, message: &str) -> Result<()> {
        writeln!(
            self.file,
            "{} - {} - {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S"),
            level,
            message
        )
        .with_context(|| format!("Failed to write run log {}", self.path.display()))
    }

    pub fn info(&mut self, message: &str) -> Result<()> {
        self.record(Level::INFO, message)
    }

    pub fn error(&mut self, message: &str) -> Result<()> {
        self.record(Level::ERROR, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_file_name_and_line_format() {
        let dir = tempfile::tempdir().unwrap();
        let started = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();

        let mut log = RunLog::create(&dir.path().join("mail"), started).unwrap();
        assert_eq!(
            log.path(),
            dir.path().join("mail").join("20240309_140507_email.log")
        );

        log.info("Generated Email - Recipient: jobs@acme.com").unwrap();
        log.error("boom").unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" - INFO - Generated Email - Recipient: jobs@acme.com"));
        assert!(lines[1].ends_with(" - ERROR - boom"));
        // "YYYY-mm-dd HH:MM:SS" prefix
        assert_eq!(lines[0].find(" - "), Some(19));
    }
}
