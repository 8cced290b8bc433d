use anyhow::Result;
use depstrap_core::{
    Catalog, Distribution, InstallLogger, PrepareError, PrepareOptions, SystemRunner,
};
use std::sync::Arc;

mod cli;

/// Install logs kept in the temp directory
const KEEP_LOGS: usize = 5;

fn main() {
    let args = cli::parse_args();

    // Initialize logger with appropriate level based on verbose flag
    if std::env::var("RUST_LOG").is_err() {
        if args.verbose {
            std::env::set_var("RUST_LOG", "debug");
        } else {
            std::env::set_var("RUST_LOG", "info");
        }
    }
    env_logger::init();

    if let Err(e) = run(&args) {
        eprintln!("\ndepstrap: {}", e);
        log::debug!("{:?}", e);
        eprintln!("depstrap: Fatal Error! Exiting now.");

        let code = e
            .downcast_ref::<PrepareError>()
            .map(PrepareError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

fn run(args: &cli::Args) -> Result<()> {
    let catalog = match &args.catalog {
        Some(path) => Catalog::load(path)?,
        None => Catalog::builtin()?,
    };

    let distro = match &args.distro {
        Some(name) => Distribution::new(
            name.as_str(),
            args.distro_version.clone().unwrap_or_default(),
            args.codename.clone().unwrap_or_default(),
        ),
        None => Distribution::detect()?,
    };

    let options = PrepareOptions {
        project_root: args.project_root.clone(),
        skip_optional: args.skip_optional,
    };

    if args.check {
        let statuses = depstrap_core::check_status(&distro, &catalog, &options, &SystemRunner::new())?;
        depstrap_core::print_dependency_status(&statuses);
        return Ok(());
    }

    if !options.project_root.is_dir() {
        anyhow::bail!(
            "Project root {} is not a directory. Use --project-root to point at it.",
            options.project_root.display()
        );
    }

    let logger = if args.no_log_file {
        None
    } else {
        if let Err(e) = InstallLogger::cleanup_old_logs(KEEP_LOGS.saturating_sub(1)) {
            log::warn!("Failed to clean up old install logs: {}", e);
        }
        let logger = InstallLogger::new()?;
        Some(Arc::new(logger))
    };

    let runner = match &logger {
        Some(logger) => SystemRunner::with_logger(logger.clone()),
        None => SystemRunner::new(),
    };

    let result = depstrap_core::prepare(&distro, &catalog, &options, &runner, None);

    if let Some(logger) = &logger {
        match &result {
            Ok(report) => {
                for failure in &report.optional_failures {
                    logger.warn(&format!(
                        "Optional dependency {} not installed: {}",
                        failure.dependency, failure.error
                    ));
                }
                logger.finalize(true);
            }
            Err(e) => {
                logger.error(&e.to_string());
                logger.finalize(false);
            }
        }
        println!("Install log saved to: {}", logger.log_path().display());
    }

    let report = result?;

    let installed: Vec<_> = report.installed().map(|r| r.dependency.as_str()).collect();
    if installed.is_empty() {
        println!("\nAll dependencies were already present.");
    } else {
        println!("\nInstalled: {}", installed.join(", "));
    }

    if !report.is_complete() {
        println!("\n⚠ Optional dependencies not installed:");
        for failure in &report.optional_failures {
            println!("  • {} - {}", failure.dependency, failure.error);
        }
    }

    Ok(())
}
