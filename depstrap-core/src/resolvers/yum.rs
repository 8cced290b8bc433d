//! YUM package manager integration (Fedora, RHEL, CentOS)
//!
//! Wired into dispatch so Fedora selects it, but nothing is implemented yet:
//! every operation reports [`PrepareError::NotImplemented`].

use super::{Outcome, Resolver, SourceKind};
use crate::error::PrepareError;
use std::collections::BTreeMap;

pub struct YumResolver {
    #[allow(dead_code)] // Package names for the future rpm/yum implementation
    packages: BTreeMap<String, String>,
}

impl YumResolver {
    pub fn new(packages: BTreeMap<String, String>) -> Self {
        Self { packages }
    }

    fn not_implemented(operation: &'static str) -> PrepareError {
        PrepareError::NotImplemented {
            resolver: "yum",
            operation,
        }
    }
}

impl Resolver for YumResolver {
    fn name(&self) -> &str {
        "yum"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Package
    }

    fn bootstrap(&self) -> Result<(), PrepareError> {
        Err(Self::not_implemented("bootstrap"))
    }

    fn find(&self, _dependency: &str) -> Result<Outcome, PrepareError> {
        Err(Self::not_implemented("find"))
    }

    fn install(&self, _dependency: &str) -> Result<(), PrepareError> {
        Err(Self::not_implemented("install"))
    }
}
