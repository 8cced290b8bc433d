//! Read-only dependency status report

use crate::resolvers::{Outcome, SourceKind};

/// Which resolver owns a dependency and whether it is present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyStatus {
    pub name: String,
    pub required: bool,
    /// Source class of the first resolver that recognised it
    pub source: Option<SourceKind>,
    pub resolver: Option<String>,
    pub outcome: Outcome,
}

impl DependencyStatus {
    pub fn unknown(name: &str, required: bool) -> Self {
        Self {
            name: name.to_string(),
            required,
            source: None,
            resolver: None,
            outcome: Outcome::Unknown,
        }
    }

    pub fn is_present(&self) -> bool {
        self.outcome == Outcome::Found
    }
}

/// Whether a run would succeed without touching any required dependency
pub fn all_required_present(statuses: &[DependencyStatus]) -> bool {
    statuses.iter().filter(|s| s.required).all(|s| s.is_present())
}

/// Prints dependency status in a formatted table
pub fn print_dependency_status(statuses: &[DependencyStatus]) {
    println!("\n==================================================");
    println!("  Dependency Status");
    println!("==================================================\n");

    for status in statuses {
        let mark = match status.outcome {
            Outcome::Found => "✓",
            Outcome::Installable => "✗",
            Outcome::Unknown => "?",
        };
        let required_label = if status.required {
            "[REQUIRED]"
        } else {
            "[OPTIONAL]"
        };

        println!("{} {} {}", mark, status.name, required_label);
        match (&status.resolver, status.outcome) {
            (Some(resolver), Outcome::Found) => println!("   installed ({})", resolver),
            (Some(resolver), _) => println!("   missing, installable using {}", resolver),
            (None, _) => println!("   not known to any package, repository or script source"),
        }
        println!();
    }

    println!("==================================================\n");

    if !all_required_present(statuses) {
        println!("⚠ WARNING: Some required dependencies are missing!");
        println!("Run 'depstrap' without --check to install them.\n");
    }
}
