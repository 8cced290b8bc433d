//! Install log for dependency preparation
//!
//! Keeps a timestamped record of every command depstrap runs, including the
//! captured output, in a file under the temp directory. Console output is the
//! job of the `log` facade and the progress callback; this file is what a
//! user attaches to a bug report.

use crate::error::PrepareError;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const LOG_PREFIX: &str = "depstrap-install-";

/// Append-only log file shared by the command runner
pub struct InstallLogger {
    log_file: Mutex<File>,
    log_path: PathBuf,
}

impl InstallLogger {
    /// Create a new log file in the system temp directory
    pub fn new() -> Result<Self, PrepareError> {
        Self::new_in(&std::env::temp_dir())
    }

    /// Create a new log file in `dir`
    pub fn new_in(dir: &Path) -> Result<Self, PrepareError> {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let log_path = dir.join(format!("{}{}.log", LOG_PREFIX, timestamp));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| PrepareError::io(&log_path, e))?;

        let logger = Self {
            log_file: Mutex::new(file),
            log_path,
        };

        logger.info("=== depstrap Dependency Preparation Log ===");
        logger.info(&format!("Version: {}", env!("CARGO_PKG_VERSION")));
        logger.info(&format!(
            "Started: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));

        Ok(logger)
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn info(&self, message: &str) {
        self.log_message("INFO", message);
    }

    pub fn warn(&self, message: &str) {
        self.log_message("WARN", message);
    }

    pub fn error(&self, message: &str) {
        self.log_message("ERROR", message);
    }

    /// Record a command line about to run
    pub fn command(&self, program: &str, args: &[&str]) {
        let mut line = program.to_string();
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        self.log_message("CMD", &line);
    }

    /// Record captured output, one entry per line
    pub fn output(&self, stream: &str, output: &str) {
        for line in output.lines() {
            self.log_message("", &format!("  {}: {}", stream, line));
        }
    }

    fn log_message(&self, level: &str, message: &str) {
        let timestamp = chrono::Local::now().format("%H:%M:%S");
        let formatted = if level.is_empty() {
            format!("[{}] {}", timestamp, message)
        } else {
            format!("[{}] [{}] {}", timestamp, level, message)
        };

        if let Ok(mut file) = self.log_file.lock() {
            let _ = writeln!(file, "{}", formatted);
            let _ = file.flush();
        }
    }

    /// Keep only the newest `keep_count` install logs in the temp directory
    pub fn cleanup_old_logs(keep_count: usize) -> Result<(), PrepareError> {
        Self::cleanup_old_logs_in(&std::env::temp_dir(), keep_count)
    }

    pub fn cleanup_old_logs_in(dir: &Path, keep_count: usize) -> Result<(), PrepareError> {
        let mut log_files: Vec<PathBuf> = std::fs::read_dir(dir)
            .map_err(|e| PrepareError::io(dir, e))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .map(|n| n.starts_with(LOG_PREFIX) && n.ends_with(".log"))
                    .unwrap_or(false)
            })
            .collect();

        // Oldest first
        log_files.sort_by_key(|path| std::fs::metadata(path).and_then(|m| m.modified()).ok());

        if log_files.len() > keep_count {
            let to_remove = log_files.len() - keep_count;
            for path in log_files.iter().take(to_remove) {
                let _ = std::fs::remove_file(path);
            }
        }

        Ok(())
    }

    /// Write the closing lines
    pub fn finalize(&self, success: bool) {
        self.info(&format!(
            "Finished: {} ({})",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            if success { "success" } else { "failure" }
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_file_records_commands_and_output() {
        let dir = TempDir::new().unwrap();
        let logger = InstallLogger::new_in(dir.path()).unwrap();

        logger.command("dpkg", &["-s", "git"]);
        logger.output("stdout", "Package: git\nStatus: install ok installed");
        logger.warn("Optional dependency doxygen not installed");
        logger.finalize(true);

        let content = std::fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("[CMD] dpkg -s git"));
        assert!(content.contains("stdout: Status: install ok installed"));
        assert!(content.contains("[WARN] Optional dependency doxygen not installed"));
        assert!(content.contains("(success)"));
    }

    #[test]
    fn test_cleanup_keeps_newest_logs() {
        let dir = TempDir::new().unwrap();
        for i in 0..4 {
            std::fs::write(dir.path().join(format!("{}2024010{}_000000.log", LOG_PREFIX, i)), "")
                .unwrap();
        }
        std::fs::write(dir.path().join("unrelated.log"), "").unwrap();

        InstallLogger::cleanup_old_logs_in(dir.path(), 2).unwrap();

        let remaining: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|n| n.starts_with(LOG_PREFIX))
            .collect();
        assert_eq!(remaining.len(), 2);
        assert!(dir.path().join("unrelated.log").exists());
    }
}
