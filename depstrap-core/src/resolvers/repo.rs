//! Source repository checkouts (git)

use super::{not_in_catalog, Outcome, Resolver, SourceKind};
use crate::catalog::RepoSpec;
use crate::error::PrepareError;
use crate::runner::CommandRunner;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Resolves dependencies by cloning them under the project root
pub struct RepoResolver<'a> {
    repositories: BTreeMap<String, RepoSpec>,
    project_root: PathBuf,
    runner: &'a dyn CommandRunner,
    git: String,
}

impl<'a> RepoResolver<'a> {
    pub fn new(
        repositories: BTreeMap<String, RepoSpec>,
        project_root: &Path,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            repositories,
            project_root: project_root.to_path_buf(),
            runner,
            git: "git".to_string(),
        }
    }

    /// Use a different git executable
    pub fn with_git(mut self, program: impl Into<String>) -> Self {
        self.git = program.into();
        self
    }

    fn checkout_path(&self, spec: &RepoSpec) -> PathBuf {
        self.project_root.join(&spec.path)
    }

    fn failed(&self, dependency: &str, reason: String) -> PrepareError {
        PrepareError::InstallFailed {
            dependency: dependency.to_string(),
            resolver: "repo".to_string(),
            reason,
        }
    }
}

impl Resolver for RepoResolver<'_> {
    fn name(&self) -> &str {
        "repo"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Repository
    }

    fn find(&self, dependency: &str) -> Result<Outcome, PrepareError> {
        match self.repositories.get(dependency) {
            None => Ok(Outcome::Unknown),
            Some(spec) if self.checkout_path(spec).exists() => Ok(Outcome::Found),
            Some(_) => Ok(Outcome::Installable),
        }
    }

    fn install(&self, dependency: &str) -> Result<(), PrepareError> {
        let spec = self
            .repositories
            .get(dependency)
            .ok_or_else(|| not_in_catalog(self, dependency))?;

        if which::which(&self.git).is_err() {
            return Err(self.failed(dependency, format!("{} not found in PATH", self.git)));
        }

        let target = self.checkout_path(spec);
        let existed = target.exists();
        let target_arg = target.to_string_lossy().to_string();

        let mut args = vec!["clone"];
        if let Some(revision) = &spec.revision {
            args.push("--branch");
            args.push(revision.as_str());
        }
        args.push(spec.url.as_str());
        args.push(target_arg.as_str());

        println!("                Running \"{} {}\"", self.git, args.join(" "));
        let output = self.runner.stream(&self.git, &args)?;

        if output.success {
            log::info!("{} checked out into {}", dependency, target.display());
            return Ok(());
        }

        // Never remove a checkout directory we did not create
        if !existed && target.exists() {
            if let Err(e) = std::fs::remove_dir_all(&target) {
                log::warn!("Failed to clean up {}: {}", target.display(), e);
            }
        }

        Err(self.failed(
            dependency,
            format!("git clone {} failed with {}", spec.url, output.describe_status()),
        ))
    }
}
