//! Dependency catalog
//!
//! Static configuration describing which dependencies a project needs and how
//! each resolver can provide them. The catalog is plain JSON so projects can
//! ship their own next to the sources; a default one is embedded in the crate.

use crate::error::PrepareError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// Catalog embedded at build time
const BUILTIN_CATALOG: &str = include_str!("../catalog.json");

/// A repository checkout record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoSpec {
    /// Clone URL
    pub url: String,
    /// Checkout location, relative to the project root
    pub path: String,
    /// Branch or tag to check out (remote default when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

/// An install script record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptSpec {
    /// Shell command, run from the project root
    pub command: String,
    /// Directory the script installs into, relative to the project root
    pub path: String,
}

/// Mapping from dependency names to per-resolver records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Dependencies required on every distribution
    #[serde(default)]
    pub required: Vec<String>,
    /// Dependencies that are nice to have
    #[serde(default)]
    pub optional: Vec<String>,
    /// Extra required dependencies keyed by lowercase distribution name
    #[serde(default)]
    pub distro_required: BTreeMap<String, Vec<String>>,
    /// Package identifiers keyed by package manager, then dependency name
    #[serde(default)]
    pub packages: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub repositories: BTreeMap<String, RepoSpec>,
    #[serde(default)]
    pub scripts: BTreeMap<String, ScriptSpec>,
}

impl Catalog {
    /// The catalog shipped with the crate
    pub fn builtin() -> Result<Self, PrepareError> {
        Self::from_json(BUILTIN_CATALOG)
    }

    /// Parse a catalog from JSON text
    pub fn from_json(data: &str) -> Result<Self, PrepareError> {
        serde_json::from_str(data).map_err(|e| PrepareError::Catalog(e.to_string()))
    }

    /// Load a catalog from a JSON file
    pub fn load(path: &Path) -> Result<Self, PrepareError> {
        let data = fs::read_to_string(path).map_err(|e| PrepareError::io(path, e))?;
        Self::from_json(&data).map_err(|e| match e {
            PrepareError::Catalog(msg) => {
                PrepareError::Catalog(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Package table for one package manager (empty if the catalog has none)
    pub fn package_table(&self, manager: &str) -> BTreeMap<String, String> {
        self.packages.get(manager).cloned().unwrap_or_default()
    }

    /// Build the requirement set for a distribution
    ///
    /// Distribution extras come first, followed by the common list. A name
    /// listed twice is kept at its first position.
    pub fn requirements_for(&self, distro_key: &str) -> RequirementSet {
        let extras = self
            .distro_required
            .get(&distro_key.to_lowercase())
            .map(|v| v.as_slice())
            .unwrap_or(&[]);

        let mut seen = HashSet::new();
        let required = extras
            .iter()
            .chain(self.required.iter())
            .filter(|name| seen.insert(*name))
            .cloned()
            .collect();

        let optional = self
            .optional
            .iter()
            .filter(|name| seen.insert(*name))
            .cloned()
            .collect();

        RequirementSet { required, optional }
    }
}

/// Ordered required and optional dependency names for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementSet {
    pub required: Vec<String>,
    pub optional: Vec<String>,
}

impl RequirementSet {
    pub fn new(required: Vec<String>, optional: Vec<String>) -> Self {
        Self { required, optional }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_builtin_catalog_parses() {
        let catalog = Catalog::builtin().unwrap();
        assert!(!catalog.required.is_empty());
        assert!(catalog.packages.contains_key("apt"));
        assert!(catalog.distro_required.contains_key("ubuntu"));
    }

    #[test]
    fn test_builtin_catalog_required_names_are_resolvable() {
        // Every required name must be known to at least one resolver table
        let catalog = Catalog::builtin().unwrap();
        let apt = catalog.package_table("apt");
        for name in catalog.requirements_for("ubuntu").required {
            let known = name == "dpkg"
                || apt.contains_key(&name)
                || catalog.repositories.contains_key(&name)
                || catalog.scripts.contains_key(&name);
            assert!(known, "{} is not in any catalog table", name);
        }
    }

    #[test]
    fn test_requirements_put_distro_extras_first() {
        let catalog = Catalog::from_json(
            r#"{
                "required": ["git", "make"],
                "optional": ["doxygen"],
                "distro_required": { "ubuntu": ["dpkg"] }
            }"#,
        )
        .unwrap();

        let reqs = catalog.requirements_for("Ubuntu");
        assert_eq!(reqs.required, vec!["dpkg", "git", "make"]);
        assert_eq!(reqs.optional, vec!["doxygen"]);
    }

    #[test]
    fn test_requirements_without_distro_entry() {
        let catalog = Catalog::from_json(r#"{ "required": ["git"] }"#).unwrap();
        let reqs = catalog.requirements_for("debian");
        assert_eq!(reqs.required, vec!["git"]);
        assert!(reqs.optional.is_empty());
    }

    #[test]
    fn test_requirements_drop_duplicates() {
        let catalog = Catalog::from_json(
            r#"{
                "required": ["git", "dpkg", "git"],
                "optional": ["git", "doxygen"],
                "distro_required": { "debian": ["dpkg"] }
            }"#,
        )
        .unwrap();

        let reqs = catalog.requirements_for("debian");
        assert_eq!(reqs.required, vec!["dpkg", "git"]);
        assert_eq!(reqs.optional, vec!["doxygen"]);
    }

    #[test]
    fn test_script_and_repo_records() {
        let catalog = Catalog::from_json(
            r#"{
                "repositories": {
                    "libchaste": { "url": "https://example.com/libchaste.git", "path": "deps/libchaste", "revision": "v1.0" }
                },
                "scripts": {
                    "libfoo": { "command": "false", "path": "vendor/libfoo" }
                }
            }"#,
        )
        .unwrap();

        let repo = &catalog.repositories["libchaste"];
        assert_eq!(repo.revision.as_deref(), Some("v1.0"));
        assert_eq!(catalog.scripts["libfoo"].path, "vendor/libfoo");
        assert!(catalog.package_table("apt").is_empty());
    }

    #[test]
    fn test_load_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = Catalog::load(file.path()).unwrap_err();
        assert!(matches!(err, PrepareError::Catalog(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Catalog::load(Path::new("/nonexistent/depstrap/catalog.json")).unwrap_err();
        assert!(matches!(err, PrepareError::Io { .. }));
    }
}
