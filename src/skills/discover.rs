//! Skill discovery under category roots.

use super::validate::validate_skill;
use crate::config::Config;
use crate::report::Findings;
use std::path::Path;
use walkdir::WalkDir;

/// Walk one category root and validate every skill found in it.
///
/// A directory holding the descriptor file is a skill and is not descended
/// into. Other directories are searched for nested skills up to
/// `config.max_depth` levels below the root's children; anything deeper is
/// silently out of scope. A missing root is not an error.
pub fn validate_category(root: &Path, config: &Config, findings: &mut Findings) {
    if !root.is_dir() {
        tracing::debug!(path = %root.display(), "category root absent, skipping");
        return;
    }

    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(config.max_depth + 1)
        .sort_by_file_name()
        .into_iter();

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                let path = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| root.display().to_string());
                tracing::warn!(%path, error = %e, "failed to read directory");
                findings.error(format!("{}: Failed to read directory - {}", path, e));
                continue;
            }
        };

        // Symlinks report their own type here, so linked dirs are skipped
        if !entry.file_type().is_dir() {
            continue;
        }

        let dir = entry.path();
        if !dir.join(&config.descriptor_file).exists() {
            tracing::debug!(path = %dir.display(), depth = entry.depth(), "container directory");
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        validate_skill(dir, &name, config, findings);
        walker.skip_current_dir();
    }
}
