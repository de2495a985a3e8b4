//! Per-skill structural checks.

use super::parser::parse_header;
use crate::config::Config;
use crate::report::Findings;
use std::path::Path;

/// Validate one skill directory.
///
/// Returns true when the descriptor exists and carries a header block, even if
/// individual fields were flagged. Only then is the skill counted as validated.
pub fn validate_skill(
    skill_dir: &Path,
    skill_name: &str,
    config: &Config,
    findings: &mut Findings,
) -> bool {
    let descriptor = skill_dir.join(&config.descriptor_file);

    if !descriptor.is_file() {
        findings.error(format!(
            "{}: Missing {} file",
            skill_name, config.descriptor_file
        ));
        return false;
    }

    let content = match std::fs::read_to_string(&descriptor) {
        Ok(c) => c,
        Err(e) => {
            findings.error(format!(
                "{}: Failed to read {} - {}",
                skill_name, config.descriptor_file, e
            ));
            return false;
        }
    };

    let Some(header) = parse_header(&content) else {
        findings.error(format!("{}: Missing or invalid YAML frontmatter", skill_name));
        return false;
    };

    for field in &config.required_fields {
        if header.non_empty(field).is_none() {
            findings.error(format!(
                "{}: Missing required frontmatter field '{}'",
                skill_name, field
            ));
        }
    }

    if let Some(name) = header.non_empty("name") {
        if name != skill_name {
            findings.warning(format!(
                "{}: Frontmatter name '{}' doesn't match directory name",
                skill_name, name
            ));
        }
    }

    if let Some(description) = header.non_empty("description") {
        if description.trim().chars().count() < config.min_description_len {
            findings.warning(format!("{}: Description seems too short", skill_name));
        }
    }

    tracing::debug!(skill = skill_name, path = %skill_dir.display(), "skill validated");
    findings.mark_validated();
    true
}
