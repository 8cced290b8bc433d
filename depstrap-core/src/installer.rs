//! Platform installer
//!
//! Drives a requirement set through the resolver chain:
//! 1. native package manager
//! 2. repository checkout
//! 3. install script
//!
//! The first resolver that recognises a dependency owns it. Required
//! dependencies stop the run on the first failure; optional ones are
//! reported and skipped.

use crate::catalog::RequirementSet;
use crate::error::PrepareError;
use crate::resolvers::{Outcome, Resolver, SourceKind};
use crate::status::DependencyStatus;

/// Progress callback for dependency preparation
/// Callback receives: (status_message, percentage)
pub type ProgressCallback = Box<dyn Fn(&str, u8) + Send>;

/// Routes progress lines to the callback, or stdout without one
struct ProgressReporter<'a> {
    callback: &'a Option<ProgressCallback>,
}

impl<'a> ProgressReporter<'a> {
    fn new(callback: &'a Option<ProgressCallback>) -> Self {
        Self { callback }
    }

    fn report(&self, message: &str, percentage: u8) {
        if let Some(ref cb) = self.callback {
            cb(message, percentage);
        } else {
            println!("[{:>3}%] {}", percentage, message);
        }
    }
}

/// How a dependency ended up satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    AlreadyPresent,
    Installed,
}

/// Record of one resolved dependency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub dependency: String,
    pub source: SourceKind,
    /// Name of the resolver that handled it ("apt", "repo", "script")
    pub resolver: String,
    pub action: Action,
}

/// An optional dependency that could not be satisfied
#[derive(Debug)]
pub struct OptionalFailure {
    pub dependency: String,
    pub error: PrepareError,
}

/// Outcome of a full run
#[derive(Debug, Default)]
pub struct PrepareReport {
    pub resolved: Vec<Resolution>,
    pub optional_failures: Vec<OptionalFailure>,
}

impl PrepareReport {
    pub fn installed(&self) -> impl Iterator<Item = &Resolution> {
        self.resolved.iter().filter(|r| r.action == Action::Installed)
    }

    pub fn is_complete(&self) -> bool {
        self.optional_failures.is_empty()
    }
}

/// Resolves one platform's dependencies through a fixed resolver chain
pub struct PlatformInstaller<'a> {
    package_manager: &'a dyn Resolver,
    repository: &'a dyn Resolver,
    script: &'a dyn Resolver,
    progress: Option<ProgressCallback>,
    skip_optional: bool,
}

impl<'a> PlatformInstaller<'a> {
    pub fn new(
        package_manager: &'a dyn Resolver,
        repository: &'a dyn Resolver,
        script: &'a dyn Resolver,
    ) -> Self {
        Self {
            package_manager,
            repository,
            script,
            progress: None,
            skip_optional: false,
        }
    }

    pub fn with_progress(mut self, progress: Option<ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    pub fn skip_optional(mut self, skip: bool) -> Self {
        self.skip_optional = skip;
        self
    }

    fn chain(&self) -> [&'a dyn Resolver; 3] {
        [self.package_manager, self.repository, self.script]
    }

    /// Resolve every required dependency, then the optional ones
    ///
    /// Returns at the first required dependency that cannot be resolved or
    /// installed; nothing after it is looked at.
    pub fn install(&self, requirements: &RequirementSet) -> Result<PrepareReport, PrepareError> {
        let reporter = ProgressReporter::new(&self.progress);

        // Without the package manager nothing else can be resolved
        self.package_manager.bootstrap()?;

        let optional: &[String] = if self.skip_optional {
            &[]
        } else {
            &requirements.optional
        };
        let total = requirements.required.len() + optional.len();
        let mut report = PrepareReport::default();

        for (index, dependency) in requirements.required.iter().enumerate() {
            let resolution = self.resolve_with(&reporter, dependency, percent(index, total))?;
            report.resolved.push(resolution);
        }

        let offset = requirements.required.len();
        for (index, dependency) in optional.iter().enumerate() {
            match self.resolve_with(&reporter, dependency, percent(offset + index, total)) {
                Ok(resolution) => report.resolved.push(resolution),
                Err(e) if e.is_platform_error() => return Err(e),
                Err(e) => {
                    log::warn!("Optional dependency {} skipped: {}", dependency, e);
                    report.optional_failures.push(OptionalFailure {
                        dependency: dependency.clone(),
                        error: e,
                    });
                }
            }
        }

        reporter.report("All dependencies prepared", 100);
        Ok(report)
    }

    /// Resolve a single dependency through the chain
    pub fn resolve(&self, dependency: &str) -> Result<Resolution, PrepareError> {
        let reporter = ProgressReporter::new(&self.progress);
        self.resolve_with(&reporter, dependency, 0)
    }

    fn resolve_with(
        &self,
        reporter: &ProgressReporter<'_>,
        dependency: &str,
        percentage: u8,
    ) -> Result<Resolution, PrepareError> {
        for resolver in self.chain() {
            match resolver.find(dependency)? {
                Outcome::Found => {
                    reporter.report(
                        &format!("Looking for {}... Found {}.", dependency, resolver.kind()),
                        percentage,
                    );
                    return Ok(resolution(dependency, resolver, Action::AlreadyPresent));
                }
                Outcome::Installable => {
                    reporter.report(
                        &format!(
                            "Looking for {}... Installing using {}...",
                            dependency,
                            resolver.name()
                        ),
                        percentage,
                    );
                    resolver.install(dependency)?;
                    return Ok(resolution(dependency, resolver, Action::Installed));
                }
                Outcome::Unknown => {
                    log::debug!("{} is not known to {}", dependency, resolver.name());
                }
            }
        }

        Err(PrepareError::Unresolvable {
            dependency: dependency.to_string(),
        })
    }

    /// Look up every dependency without installing anything
    pub fn survey(&self, requirements: &RequirementSet) -> Result<Vec<DependencyStatus>, PrepareError> {
        self.package_manager.bootstrap()?;

        let required = requirements.required.iter().map(|d| (d, true));
        let optional = requirements.optional.iter().map(|d| (d, false));

        let mut statuses = Vec::new();
        for (dependency, is_required) in required.chain(optional) {
            let mut status = DependencyStatus::unknown(dependency, is_required);
            for resolver in self.chain() {
                let outcome = resolver.find(dependency)?;
                if outcome != Outcome::Unknown {
                    status = DependencyStatus {
                        name: dependency.clone(),
                        required: is_required,
                        source: Some(resolver.kind()),
                        resolver: Some(resolver.name().to_string()),
                        outcome,
                    };
                    break;
                }
            }
            statuses.push(status);
        }

        Ok(statuses)
    }
}

fn resolution(dependency: &str, resolver: &dyn Resolver, action: Action) -> Resolution {
    Resolution {
        dependency: dependency.to_string(),
        source: resolver.kind(),
        resolver: resolver.name().to_string(),
        action,
    }
}

fn percent(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((index * 100) / total).min(99) as u8
}
