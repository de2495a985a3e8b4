//! Structural validator for a repository of skill directories and its
//! `skills.json` manifest.
//!
//! ```ignore
//! use skillcheck::{config::Config, run};
//!
//! let config = Config::load(root, None)?;
//! let findings = run(root, &config);
//! print!("{}", findings.render());
//! std::process::exit(findings.exit_code());
//! ```

pub mod config;
pub mod manifest;
pub mod report;
pub mod skills;

use config::Config;
use report::Findings;
use std::path::Path;

/// Validate every category under `root`, then the manifest.
pub fn run(root: &Path, config: &Config) -> Findings {
    let mut findings = Findings::new();

    for category in &config.categories {
        skills::validate_category(&root.join(category), config, &mut findings);
    }

    manifest::validate_manifest(root, config, &mut findings);

    tracing::info!(
        validated = findings.validated(),
        errors = findings.errors().len(),
        warnings = findings.warnings().len(),
        "validation finished"
    );
    findings
}
