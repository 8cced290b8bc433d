//! Distribution dispatch
//!
//! Maps a distribution to its native package manager and wires up the
//! platform installer for it.

use crate::catalog::Catalog;
use crate::distro::Distribution;
use crate::error::PrepareError;
use crate::installer::{PlatformInstaller, PrepareReport, ProgressCallback};
use crate::resolvers::{AptResolver, RepoResolver, Resolver, ScriptResolver, YumResolver};
use crate::runner::CommandRunner;
use crate::status::DependencyStatus;
use std::path::PathBuf;

/// Native package manager families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManagerKind {
    /// dpkg/apt-get (Debian, Ubuntu)
    Apt,
    /// rpm/yum (Fedora, RHEL)
    Yum,
}

impl PackageManagerKind {
    /// Catalog table name
    pub fn name(&self) -> &'static str {
        match self {
            PackageManagerKind::Apt => "apt",
            PackageManagerKind::Yum => "yum",
        }
    }

    fn resolver<'a>(
        &self,
        catalog: &Catalog,
        runner: &'a dyn CommandRunner,
    ) -> Box<dyn Resolver + 'a> {
        let packages = catalog.package_table(self.name());
        match self {
            PackageManagerKind::Apt => Box::new(AptResolver::new(packages, runner)),
            PackageManagerKind::Yum => Box::new(YumResolver::new(packages)),
        }
    }
}

/// A supported distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Lowercase distribution name
    pub key: &'static str,
    pub package_manager: PackageManagerKind,
    pub tested: bool,
}

/// Supported distributions
pub const PLATFORMS: &[Platform] = &[
    Platform {
        key: "ubuntu",
        package_manager: PackageManagerKind::Apt,
        tested: true,
    },
    Platform {
        key: "debian",
        package_manager: PackageManagerKind::Apt,
        tested: false,
    },
    Platform {
        key: "fedora",
        package_manager: PackageManagerKind::Yum,
        tested: false,
    },
];

/// Find the platform for a distribution
pub fn select_platform(distro: &Distribution) -> Result<&'static Platform, PrepareError> {
    let key = distro.key();
    PLATFORMS
        .iter()
        .find(|p| p.key == key)
        .ok_or_else(|| PrepareError::UnsupportedPlatform {
            distribution: distro.name.clone(),
        })
}

/// Options for one preparation run
#[derive(Debug, Clone)]
pub struct PrepareOptions {
    /// Directory script and repository paths are relative to
    pub project_root: PathBuf,
    /// Leave optional dependencies alone
    pub skip_optional: bool,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from(".."),
            skip_optional: false,
        }
    }
}

/// Prepare every dependency the catalog lists for `distro`
pub fn prepare(
    distro: &Distribution,
    catalog: &Catalog,
    options: &PrepareOptions,
    runner: &dyn CommandRunner,
    progress: Option<ProgressCallback>,
) -> Result<PrepareReport, PrepareError> {
    let platform = select_platform(distro)?;
    announce(distro, platform);

    let requirements = catalog.requirements_for(platform.key);
    let package_manager = platform.package_manager.resolver(catalog, runner);
    let repository = RepoResolver::new(catalog.repositories.clone(), &options.project_root, runner);
    let script = ScriptResolver::new(catalog.scripts.clone(), &options.project_root, runner);

    PlatformInstaller::new(package_manager.as_ref(), &repository, &script)
        .with_progress(progress)
        .skip_optional(options.skip_optional)
        .install(&requirements)
}

/// Report the state of every dependency without installing anything
pub fn check_status(
    distro: &Distribution,
    catalog: &Catalog,
    options: &PrepareOptions,
    runner: &dyn CommandRunner,
) -> Result<Vec<DependencyStatus>, PrepareError> {
    let platform = select_platform(distro)?;
    announce(distro, platform);

    let requirements = catalog.requirements_for(platform.key);
    let package_manager = platform.package_manager.resolver(catalog, runner);
    let repository = RepoResolver::new(catalog.repositories.clone(), &options.project_root, runner);
    let script = ScriptResolver::new(catalog.scripts.clone(), &options.project_root, runner);

    PlatformInstaller::new(package_manager.as_ref(), &repository, &script).survey(&requirements)
}

fn announce(distro: &Distribution, platform: &Platform) {
    if !platform.tested {
        log::warn!("Untested distribution \"{}\"", distro.name);
    }
    log::info!(
        "Detected system is running \"{}\" (using {})",
        distro,
        platform.package_manager.name()
    );
}
