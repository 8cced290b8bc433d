use clap::Parser;
use std::path::PathBuf;

/// Prepares a project's build dependencies
#[derive(Parser, Debug)]
#[command(name = "depstrap")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Installs project dependencies via the package manager, repository checkouts or install scripts",
    long_about = None
)]
pub struct Args {
    /// Dependency catalog (JSON); the built-in catalog is used when omitted
    #[arg(short = 'c', long = "catalog", value_name = "FILE")]
    pub catalog: Option<PathBuf>,

    /// Directory repository and script paths are relative to
    #[arg(short = 'r', long = "project-root", value_name = "DIR", default_value = "..")]
    pub project_root: PathBuf,

    /// Distribution name (detected from /etc/os-release when omitted)
    #[arg(long = "distro", value_name = "NAME")]
    pub distro: Option<String>,

    /// Distribution version, used with --distro
    #[arg(long = "distro-version", value_name = "VERSION", requires = "distro")]
    pub distro_version: Option<String>,

    /// Distribution codename, used with --distro
    #[arg(long = "codename", value_name = "NAME", requires = "distro")]
    pub codename: Option<String>,

    /// Check dependency status without installing
    #[arg(long = "check")]
    pub check: bool,

    /// Do not resolve optional dependencies
    #[arg(long = "skip-optional")]
    pub skip_optional: bool,

    /// Do not write an install log file
    #[arg(long = "no-log-file")]
    pub no_log_file: bool,

    /// Verbose logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Parses command-line arguments
pub fn parse_args() -> Args {
    Args::parse()
}
