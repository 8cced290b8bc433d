//! Error taxonomy for dependency preparation
//!
//! Every failure the resolver chain can hit is a distinct variant so callers
//! can decide what to do with it. The library never exits the process; the
//! CLI maps each variant to an exit status with [`PrepareError::exit_code`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while preparing dependencies
#[derive(Error, Debug)]
pub enum PrepareError {
    /// No resolver in the chain recognises the dependency
    #[error("The dependency \"{dependency}\" cannot be resolved: it is not a known package, repository or script based resource")]
    Unresolvable { dependency: String },

    /// A resolver recognised the dependency but could not install it
    #[error("Could not install dependency \"{dependency}\" using {resolver}: {reason}")]
    InstallFailed {
        dependency: String,
        resolver: String,
        reason: String,
    },

    /// The distribution has no platform installer
    #[error("Unknown Linux distribution \"{distribution}\"")]
    UnsupportedPlatform { distribution: String },

    /// The resolver is wired in but has no implementation yet
    #[error("{resolver} resolver: {operation} is not implemented")]
    NotImplemented {
        resolver: &'static str,
        operation: &'static str,
    },

    /// The package manager tool itself is absent
    #[error("Could not find \"{tool}\", which is necessary for preparing dependencies on this system")]
    PackageManagerMissing { tool: String },

    /// `install` was called for a dependency the resolver does not know
    #[error("{resolver} resolver has no catalog entry for \"{dependency}\"")]
    NotInCatalog { dependency: String, resolver: String },

    /// An external command could not be spawned
    #[error("Failed to execute {program}: {source}")]
    Command {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem error on a specific path
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog could not be read or parsed
    #[error("Invalid catalog: {0}")]
    Catalog(String),

    /// Distribution could not be detected
    #[error("Could not detect distribution: {0}")]
    Detection(String),
}

impl PrepareError {
    /// Process exit status the CLI uses for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            PrepareError::UnsupportedPlatform { .. } => 2,
            PrepareError::Unresolvable { .. } => 3,
            PrepareError::InstallFailed { .. } => 4,
            PrepareError::NotImplemented { .. } => 5,
            PrepareError::PackageManagerMissing { .. } => 6,
            PrepareError::NotInCatalog { .. }
            | PrepareError::Command { .. }
            | PrepareError::Io { .. }
            | PrepareError::Catalog(_)
            | PrepareError::Detection(_) => 1,
        }
    }

    /// Errors that describe the platform rather than a single dependency.
    /// These stay fatal even while resolving optional dependencies.
    pub fn is_platform_error(&self) -> bool {
        matches!(
            self,
            PrepareError::UnsupportedPlatform { .. }
                | PrepareError::NotImplemented { .. }
                | PrepareError::PackageManagerMissing { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PrepareError::Io {
            path: path.into(),
            source,
        }
    }
}
