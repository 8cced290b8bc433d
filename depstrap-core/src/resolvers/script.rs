//! Custom install scripts
//!
//! Script commands run from the project root so they can use paths relative
//! to it. A script owns one install directory: it exists once the dependency
//! is installed. When the script fails, every directory created for it is
//! removed again.

use super::{not_in_catalog, Outcome, Resolver, SourceKind};
use crate::catalog::ScriptSpec;
use crate::error::PrepareError;
use crate::runner::{CommandOutput, CommandRunner};
use crate::workdir::WorkingDirGuard;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub struct ScriptResolver<'a> {
    scripts: BTreeMap<String, ScriptSpec>,
    project_root: PathBuf,
    runner: &'a dyn CommandRunner,
}

impl<'a> ScriptResolver<'a> {
    pub fn new(
        scripts: BTreeMap<String, ScriptSpec>,
        project_root: &Path,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            scripts,
            project_root: project_root.to_path_buf(),
            runner,
        }
    }

    fn install_path(&self, spec: &ScriptSpec) -> PathBuf {
        self.project_root.join(&spec.path)
    }

    fn run_from_project_root(&self, command: &str) -> Result<CommandOutput, PrepareError> {
        let _cwd = WorkingDirGuard::enter(&self.project_root)?;
        println!("{}", command);
        self.runner.stream("sh", &["-c", command])
    }
}

impl Resolver for ScriptResolver<'_> {
    fn name(&self) -> &str {
        "script"
    }

    fn kind(&self) -> SourceKind {
        SourceKind::Script
    }

    fn find(&self, dependency: &str) -> Result<Outcome, PrepareError> {
        match self.scripts.get(dependency) {
            None => Ok(Outcome::Unknown),
            Some(spec) if self.install_path(spec).exists() => Ok(Outcome::Found),
            Some(_) => Ok(Outcome::Installable),
        }
    }

    fn install(&self, dependency: &str) -> Result<(), PrepareError> {
        let spec = self
            .scripts
            .get(dependency)
            .ok_or_else(|| not_in_catalog(self, dependency))?;

        let target = self.install_path(spec);
        let created = outermost_missing(&target);
        std::fs::create_dir_all(&target).map_err(|e| PrepareError::io(&target, e))?;

        // The working directory is restored before any cleanup below
        let result = self.run_from_project_root(&spec.command);

        let failure = match result {
            Ok(output) if output.success => {
                log::info!("{} installed by script into {}", dependency, target.display());
                return Ok(());
            }
            Ok(output) => PrepareError::InstallFailed {
                dependency: dependency.to_string(),
                resolver: "script".to_string(),
                reason: format!("install script failed with {}", output.describe_status()),
            },
            Err(e) => e,
        };

        if let Some(created) = created {
            if let Err(e) = std::fs::remove_dir_all(&created) {
                log::warn!("Failed to clean up {}: {}", created.display(), e);
            }
        }

        Err(failure)
    }
}

/// The highest directory `create_dir_all(path)` would create, if any
fn outermost_missing(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .take_while(|dir| !dir.as_os_str().is_empty() && !dir.exists())
        .last()
        .map(Path::to_path_buf)
}
