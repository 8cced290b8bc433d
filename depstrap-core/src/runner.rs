//! External command execution
//!
//! All resolvers spawn processes through [`CommandRunner`] so the resolution
//! logic can be exercised without touching the host package database.

use crate::error::PrepareError;
use crate::logger::InstallLogger;
use std::process::{Command, Stdio};
use std::sync::Arc;

/// Result of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    /// Captured stdout (empty for streamed commands)
    pub stdout: String,
    /// Captured stderr (empty for streamed commands)
    pub stderr: String,
}

impl CommandOutput {
    /// Short human readable description of the exit status
    pub fn describe_status(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

pub trait CommandRunner {
    /// Run a command with stdout/stderr captured
    fn capture(&self, program: &str, args: &[&str]) -> Result<CommandOutput, PrepareError>;

    /// Run a command with stdout/stderr attached to the terminal
    fn stream(&self, program: &str, args: &[&str]) -> Result<CommandOutput, PrepareError>;
}

/// Runs commands on the host, optionally recording them in an install log
#[derive(Default, Clone)]
pub struct SystemRunner {
    logger: Option<Arc<InstallLogger>>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(logger: Arc<InstallLogger>) -> Self {
        Self {
            logger: Some(logger),
        }
    }

    fn spawn_error(&self, program: &str, source: std::io::Error) -> PrepareError {
        if let Some(logger) = &self.logger {
            logger.error(&format!("Failed to execute {}: {}", program, source));
        }
        PrepareError::Command {
            program: program.to_string(),
            source,
        }
    }
}

impl CommandRunner for SystemRunner {
    fn capture(&self, program: &str, args: &[&str]) -> Result<CommandOutput, PrepareError> {
        log::debug!("Running {} {}", program, args.join(" "));
        if let Some(logger) = &self.logger {
            logger.command(program, args);
        }

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| self.spawn_error(program, e))?;

        let result = CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if let Some(logger) = &self.logger {
            logger.output("stdout", &result.stdout);
            logger.output("stderr", &result.stderr);
            logger.info(&format!("{} finished with {}", program, result.describe_status()));
        }

        Ok(result)
    }

    fn stream(&self, program: &str, args: &[&str]) -> Result<CommandOutput, PrepareError> {
        log::debug!("Running {} {} (streaming)", program, args.join(" "));
        if let Some(logger) = &self.logger {
            logger.command(program, args);
        }

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|e| self.spawn_error(program, e))?;

        let result = CommandOutput {
            success: status.success(),
            code: status.code(),
            ..Default::default()
        };

        if let Some(logger) = &self.logger {
            logger.info(&format!("{} finished with {}", program, result.describe_status()));
        }

        Ok(result)
    }
}

/// Whether the current process runs as root
pub fn is_root() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_reports_success_and_stdout() {
        let runner = SystemRunner::new();
        let out = runner.capture("sh", &["-c", "echo hello"]).unwrap();
        assert!(out.success);
        assert_eq!(out.code, Some(0));
        assert_eq!(out.stdout.trim(), "hello");
    }

    #[test]
    fn test_capture_reports_failure() {
        let runner = SystemRunner::new();
        let out = runner.capture("sh", &["-c", "exit 3"]).unwrap();
        assert!(!out.success);
        assert_eq!(out.describe_status(), "exit status 3");
    }

    #[test]
    fn test_missing_program_is_a_command_error() {
        let runner = SystemRunner::new();
        let err = runner
            .capture("this_command_definitely_does_not_exist_12345", &[])
            .unwrap_err();
        assert!(matches!(err, PrepareError::Command { .. }));
    }

    #[test]
    fn test_runner_writes_install_log() {
        let dir = tempfile::TempDir::new().unwrap();
        let logger = Arc::new(InstallLogger::new_in(dir.path()).unwrap());
        let runner = SystemRunner::with_logger(logger.clone());

        runner.capture("sh", &["-c", "echo logged-line"]).unwrap();

        let content = std::fs::read_to_string(logger.log_path()).unwrap();
        assert!(content.contains("[CMD] sh -c echo logged-line"));
        assert!(content.contains("stdout: logged-line"));
    }
}
