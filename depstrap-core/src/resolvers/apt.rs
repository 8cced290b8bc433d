//! APT package manager integration (Debian, Ubuntu)

use super::{not_in_catalog, Outcome, Resolver, SourceKind};
use crate::error::PrepareError;
use crate::runner::{is_root, CommandRunner};
use std::collections::BTreeMap;

/// The tool every other apt lookup depends on
const BOOTSTRAP_TOOL: &str = "dpkg";

const INSTALLED_STATUS: &str = "Status: install ok installed";

/// Resolves dependencies through dpkg/apt-get
pub struct AptResolver<'a> {
    packages: BTreeMap<String, String>,
    runner: &'a dyn CommandRunner,
    use_sudo: bool,
}

impl<'a> AptResolver<'a> {
    /// `packages` maps dependency names to Debian package names
    pub fn new(packages: BTreeMap<String, String>, runner: &'a dyn CommandRunner) -> Self {
        Self {
            packages,
            runner,
            use_sudo: !is_root(),
        }
    }

    /// Override whether installs are prefixed with sudo
    pub fn use_sudo(mut self, use_sudo: bool) -> Self {
        self.use_sudo = use_sudo;
        self
    }

    fn dpkg_available(&self) -> bool {
        self.runner
            .capture(BOOTSTRAP_TOOL, &["--version"])
            .map(|o| o.success)
            .unwrap_or(false)
    }
}

impl Resolver for AptResolver<'_> {
    fn name(&self) -> &str {
        "apt"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Package
    }

    fn bootstrap(&self) -> Result<(), PrepareError> {
        if self.dpkg_available() {
            Ok(())
        } else {
            Err(PrepareError::PackageManagerMissing {
                tool: BOOTSTRAP_TOOL.to_string(),
            })
        }
    }

    fn find(&self, dependency: &str) -> Result<Outcome, PrepareError> {
        // dpkg is checked directly; it is what answers every other lookup
        if dependency == BOOTSTRAP_TOOL {
            return self.bootstrap().map(|_| Outcome::Found);
        }

        let Some(package) = self.packages.get(dependency) else {
            return Ok(Outcome::Unknown);
        };

        // dpkg -s exits non-zero for packages it has never seen
        let output = self.runner.capture(BOOTSTRAP_TOOL, &["-s", package.as_str()])?;
        if output.success && output.stdout.lines().any(|l| l.trim() == INSTALLED_STATUS) {
            Ok(Outcome::Found)
        } else {
            Ok(Outcome::Installable)
        }
    }

    fn install(&self, dependency: &str) -> Result<(), PrepareError> {
        let package = self
            .packages
            .get(dependency)
            .ok_or_else(|| not_in_catalog(self, dependency))?;

        let output = if self.use_sudo {
            println!("                Running \"sudo apt-get -y install {}\"", package);
            self.runner
                .stream("sudo", &["apt-get", "-y", "install", package.as_str()])?
        } else {
            println!("                Running \"apt-get -y install {}\"", package);
            self.runner.stream("apt-get", &["-y", "install", package.as_str()])?
        };

        if output.success {
            log::info!("{} installed via apt ({})", dependency, package);
            Ok(())
        } else {
            Err(PrepareError::InstallFailed {
                dependency: dependency.to_string(),
                resolver: "apt".to_string(),
                reason: format!("apt-get install {} failed with {}", package, output.describe_status()),
            })
        }
    }
}
