//! Distribution identity and detection

use crate::error::PrepareError;
use std::fmt;
use std::fs;
use std::path::Path;

const OS_RELEASE: &str = "/etc/os-release";

/// Detected distribution: name, version and version codename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    pub name: String,
    pub version: String,
    pub codename: String,
}

impl Distribution {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        codename: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            codename: codename.into(),
        }
    }

    /// Detect the running distribution from /etc/os-release
    pub fn detect() -> Result<Self, PrepareError> {
        Self::detect_from(Path::new(OS_RELEASE))
    }

    /// Detect from an os-release style file
    pub fn detect_from(path: &Path) -> Result<Self, PrepareError> {
        if !path.exists() {
            return Err(PrepareError::Detection(format!(
                "no {} found",
                path.display()
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| PrepareError::Detection(format!("failed to read {}: {}", path.display(), e)))?;

        Self::parse_os_release(&content).ok_or_else(|| {
            PrepareError::Detection(format!("{} has neither ID nor NAME", path.display()))
        })
    }

    /// Parse os-release content
    ///
    /// `ID` names the distribution, falling back to `NAME` for files that
    /// omit it.
    pub fn parse_os_release(content: &str) -> Option<Self> {
        let mut id = None;
        let mut name = None;
        let mut version = String::new();
        let mut codename = String::new();

        for line in content.lines() {
            let Some((key, value)) = line.trim().split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').trim_matches('\'').to_string();
            match key {
                "ID" => id = Some(value),
                "NAME" => name = Some(value),
                "VERSION_ID" => version = value,
                "VERSION_CODENAME" => codename = value,
                _ => {}
            }
        }

        let name = id.or(name).filter(|n| !n.is_empty())?;
        Some(Self {
            name,
            version,
            codename,
        })
    }

    /// Lowercase name used as the catalog and dispatch key
    pub fn key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.version.is_empty() {
            write!(f, " {}", self.version)?;
        }
        if !self.codename.is_empty() {
            write!(f, " ({})", self.codename)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_ubuntu_os_release() {
        let content = r#"NAME="Ubuntu"
VERSION="22.04.3 LTS (Jammy Jellyfish)"
ID=ubuntu
ID_LIKE=debian
VERSION_ID="22.04"
VERSION_CODENAME=jammy
"#;
        let distro = Distribution::parse_os_release(content).unwrap();
        assert_eq!(distro.name, "ubuntu");
        assert_eq!(distro.version, "22.04");
        assert_eq!(distro.codename, "jammy");
    }

    #[test]
    fn test_parse_falls_back_to_name() {
        let distro = Distribution::parse_os_release("NAME=\"Fedora\"\nVERSION_ID=39\n").unwrap();
        assert_eq!(distro.name, "Fedora");
        assert_eq!(distro.key(), "fedora");
        assert_eq!(distro.codename, "");
    }

    #[test]
    fn test_parse_without_identity() {
        assert!(Distribution::parse_os_release("VERSION_ID=12\n# comment\n").is_none());
    }

    #[test]
    fn test_detect_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ID=debian").unwrap();
        writeln!(file, "VERSION_ID=\"12\"").unwrap();
        writeln!(file, "VERSION_CODENAME=bookworm").unwrap();

        let distro = Distribution::detect_from(file.path()).unwrap();
        assert_eq!(distro, Distribution::new("debian", "12", "bookworm"));
    }

    #[test]
    fn test_detect_from_missing_file() {
        let err = Distribution::detect_from(Path::new("/nonexistent/os-release")).unwrap_err();
        assert!(matches!(err, PrepareError::Detection(_)));
    }

    #[test]
    fn test_display() {
        let distro = Distribution::new("Ubuntu", "22.04", "jammy");
        assert_eq!(distro.to_string(), "Ubuntu 22.04 (jammy)");
        assert_eq!(Distribution::new("Fedora", "", "").to_string(), "Fedora");
    }
}
