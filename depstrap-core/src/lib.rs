//! Prepare a project's external dependencies on a Linux host.
//!
//! Dependencies come from a [`Catalog`]. Each one is resolved through a fixed
//! chain of sources: the distribution's package manager, then a repository
//! checkout, then a custom install script. The first source that recognises a
//! dependency owns it.

// Internal modules (private)
mod catalog;
mod dispatch;
mod distro;
mod error;
mod installer;
mod logger;
mod resolvers;
mod runner;
mod status;
mod workdir;

#[cfg(test)]
mod testing;

// Re-export public types
pub use catalog::{Catalog, RepoSpec, RequirementSet, ScriptSpec};
pub use dispatch::{
    check_status, prepare, select_platform, PackageManagerKind, Platform, PrepareOptions, PLATFORMS,
};
pub use distro::Distribution;
pub use error::PrepareError;
pub use installer::{
    Action, OptionalFailure, PlatformInstaller, PrepareReport, ProgressCallback, Resolution,
};
pub use logger::InstallLogger;
pub use resolvers::{
    AptResolver, Outcome, RepoResolver, Resolver, ScriptResolver, SourceKind, YumResolver,
};
pub use runner::{CommandOutput, CommandRunner, SystemRunner};
pub use status::{all_required_present, print_dependency_status, DependencyStatus};
pub use workdir::WorkingDirGuard;
