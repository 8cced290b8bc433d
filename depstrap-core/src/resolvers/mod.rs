//! Dependency sources
//!
//! Each resolver knows one way of providing dependencies:
//! - apt (Debian, Ubuntu)
//! - yum (Fedora, RHEL; not implemented yet)
//! - repository checkouts (git)
//! - install scripts
//!
//! The platform installer asks them in a fixed order and stops at the first
//! one that recognises a dependency.

mod apt;
mod repo;
mod script;
mod yum;

pub use apt::AptResolver;
pub use repo::RepoResolver;
pub use script::ScriptResolver;
pub use yum::YumResolver;

use crate::error::PrepareError;
use std::fmt;

/// What a resolver knows about a dependency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Known to this resolver and already installed
    Found,
    /// Known to this resolver but not installed
    Installable,
    /// Not known to this resolver
    Unknown,
}

/// Class of dependency source, in chain order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Package,
    Repository,
    Script,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Package => "package",
            SourceKind::Repository => "repo",
            SourceKind::Script => "script",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A find/install capability pair for one class of dependency source
pub trait Resolver {
    /// Short name used in messages ("apt", "repo", "script")
    fn name(&self) -> &str;

    fn kind(&self) -> SourceKind;

    /// Verify the resolver's own tooling before any dependency is resolved
    fn bootstrap(&self) -> Result<(), PrepareError> {
        Ok(())
    }

    fn find(&self, dependency: &str) -> Result<Outcome, PrepareError>;

    /// Install a dependency that `find` reported as [`Outcome::Installable`]
    ///
    /// Calling this for a dependency outside the resolver's catalog is a
    /// caller bug and returns [`PrepareError::NotInCatalog`].
    fn install(&self, dependency: &str) -> Result<(), PrepareError>;
}

pub(crate) fn not_in_catalog(resolver: &dyn Resolver, dependency: &str) -> PrepareError {
    PrepareError::NotInCatalog {
        dependency: dependency.to_string(),
        resolver: resolver.name().to_string(),
    }
}
