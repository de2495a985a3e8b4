//! skills.json manifest loading and cross-checks.
//!
//! The manifest registers every skill with a repository-relative path, an
//! optional version and an optional category:
//!
//! ```json
//! {
//!   "version": "1.0.0",
//!   "categories": { "core": { "description": "..." } },
//!   "skills": {
//!     "pdf-tools": { "path": "core/pdf-tools", "version": "0.2.0", "category": "core" }
//!   }
//! }
//! ```

use crate::config::Config;
use crate::report::Findings;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

static SEMVER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").expect("Failed to compile semver regex"));

/// `<int>.<int>.<int>`, nothing else
pub fn is_semver(version: &str) -> bool {
    SEMVER.is_match(version)
}

/// Manifest root. Presence rules are enforced by [`validate_manifest`] so they
/// can be reported as findings; `skills` entries are typed one at a time with
/// [`ManifestSkill::from_value`] so a bad entry only affects itself.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,
    /// Only the keys matter; category metadata is opaque
    #[serde(default)]
    pub categories: Option<Value>,
    #[serde(default)]
    pub skills: Option<Value>,
}

/// One registered skill
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManifestSkill {
    #[serde(default, deserialize_with = "lenient_string")]
    pub path: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
}

impl ManifestSkill {
    /// Type a single `skills` entry
    pub fn from_value(value: &Value) -> Result<Self, String> {
        if !value.is_object() {
            return Err(format!("expected an object, found {}", kind(value)));
        }
        Self::deserialize(value).map_err(|e| e.to_string())
    }
}

/// Any JSON scalar read as text. `null`, `false` and `0` read as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => Some(s),
        other if !truthy(&other) => None,
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    })
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Failure to obtain a usable manifest. The display text is the finding text.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("{file}: Manifest file not found")]
    NotFound { file: String },

    #[error("{file}: Failed to read manifest - {source}")]
    Read {
        file: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{file}: Invalid JSON - {source}")]
    InvalidJson {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{file}: Invalid manifest - {reason}")]
    Schema { file: String, reason: String },
}

impl Manifest {
    /// Load and shape-check the manifest at `path`.
    ///
    /// `file` is the name used in error messages.
    pub fn load(path: &Path, file: &str) -> Result<Self, ManifestError> {
        if !path.is_file() {
            return Err(ManifestError::NotFound {
                file: file.to_string(),
            });
        }

        let data = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            file: file.to_string(),
            source,
        })?;

        Self::parse(&data, file)
    }

    /// Parse manifest text. Only a non-object top level is a shape error.
    pub fn parse(data: &str, file: &str) -> Result<Self, ManifestError> {
        let value: Value =
            serde_json::from_str(data).map_err(|source| ManifestError::InvalidJson {
                file: file.to_string(),
                source,
            })?;

        if !value.is_object() {
            return Err(ManifestError::Schema {
                file: file.to_string(),
                reason: format!("expected an object at the top level, found {}", kind(&value)),
            });
        }

        serde_json::from_value(value).map_err(|e| ManifestError::Schema {
            file: file.to_string(),
            reason: e.to_string(),
        })
    }

    /// Registered skills as `(name, raw entry)`, or `None` when `skills` is
    /// missing. Arrays are keyed by index; other scalars have no entries.
    pub fn skill_entries(&self) -> Option<Vec<(String, &Value)>> {
        let skills = self.skills.as_ref().filter(|v| truthy(v))?;
        Some(match skills {
            Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, v)| (i.to_string(), v))
                .collect(),
            _ => Vec::new(),
        })
    }

    /// Whether `category` is registered. `None` when there is no registry to
    /// check against.
    pub fn has_category(&self, category: &str) -> Option<bool> {
        let categories = self.categories.as_ref().filter(|v| truthy(v))?;
        Some(match categories {
            Value::Object(map) => map.contains_key(category),
            Value::Array(items) => category.parse::<usize>().is_ok_and(|i| i < items.len()),
            _ => false,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Resolve a manifest path under the repository root. Leading separators are
/// ignored so every entry stays root-relative.
fn resolve(root: &Path, rel: &str) -> PathBuf {
    root.join(rel.trim_start_matches(['/', '\\']))
}

/// Validate the manifest under `root` and cross-check it against the filesystem.
pub fn validate_manifest(root: &Path, config: &Config, findings: &mut Findings) {
    let file = config.manifest_file.as_str();
    let manifest = match Manifest::load(&root.join(file), file) {
        Ok(m) => m,
        Err(e) => {
            findings.error(e.to_string());
            return;
        }
    };

    match non_empty(&manifest.version) {
        None => findings.error(format!("{}: Missing version field", file)),
        Some(version) if !is_semver(version) => findings.error(format!(
            "{}: Version '{}' is not valid semver",
            file, version
        )),
        Some(_) => {}
    }

    let Some(entries) = manifest.skill_entries() else {
        findings.error(format!("{}: Missing skills object", file));
        return;
    };

    tracing::debug!(count = entries.len(), "checking manifest entries");

    for (name, raw) in entries {
        let skill = match ManifestSkill::from_value(raw) {
            Ok(s) => s,
            Err(reason) => {
                findings.error(format!(
                    "{}: Skill '{}' entry is not valid - {}",
                    file, name, reason
                ));
                continue;
            }
        };

        let Some(rel) = non_empty(&skill.path) else {
            findings.error(format!("{}: Skill '{}' missing path", file, name));
            continue;
        };

        if !resolve(root, rel).exists() {
            findings.error(format!(
                "{}: Skill '{}' path '{}' does not exist",
                file, name, rel
            ));
        }

        if let Some(version) = non_empty(&skill.version) {
            if !is_semver(version) {
                findings.warning(format!(
                    "{}: Skill '{}' version '{}' is not valid semver",
                    file, name, version
                ));
            }
        }

        if let Some(category) = non_empty(&skill.category) {
            if manifest.has_category(category) == Some(false) {
                findings.warning(format!(
                    "{}: Skill '{}' has undefined category '{}'",
                    file, name, category
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn repo(manifest: &str) -> TempDir {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("skills.json"), manifest).unwrap();
        tmp
    }

    fn run(tmp: &TempDir) -> Findings {
        let mut findings = Findings::new();
        validate_manifest(tmp.path(), &Config::default(), &mut findings);
        findings
    }

    fn messages(findings: &[crate::report::Finding]) -> Vec<&str> {
        findings.iter().map(|f| f.message.as_str()).collect()
    }

    #[test]
    fn test_semver_shape() {
        assert!(is_semver("1.0.0"));
        assert!(is_semver("10.20.30"));
        assert!(!is_semver("1.0"));
        assert!(!is_semver("v1.0.0"));
        assert!(!is_semver("1.0.0-beta"));
        assert!(!is_semver("1.0.0\n"));
        assert!(!is_semver("١.٢.٣"));
    }

    #[test]
    fn test_valid_manifest() {
        let tmp = repo(r#"{"version": "1.0.0", "skills": {"alpha": {"path": "core/alpha"}}}"#);
        fs::create_dir_all(tmp.path().join("core/alpha")).unwrap();

        let findings = run(&tmp);
        assert!(findings.errors().is_empty());
        assert!(findings.warnings().is_empty());
    }

    #[test]
    fn test_missing_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let findings = run(&tmp);
        assert_eq!(
            messages(findings.errors()),
            vec!["skills.json: Manifest file not found"]
        );
    }

    #[test]
    fn test_invalid_json() {
        let tmp = repo("{ not json");
        let findings = run(&tmp);
        assert_eq!(findings.errors().len(), 1);
        assert!(findings.errors()[0]
            .message
            .starts_with("skills.json: Invalid JSON - "));
    }

    #[test]
    fn test_non_object_top_level() {
        let tmp = repo(r#"["1.0.0"]"#);
        let findings = run(&tmp);
        assert_eq!(
            messages(findings.errors()),
            vec!["skills.json: Invalid manifest - expected an object at the top level, found an array"]
        );
    }

    #[test]
    fn test_numeric_version_checked_as_text() {
        let tmp = repo(r#"{"version": 1, "skills": {"a": {"path": "missing"}}}"#);
        let findings = run(&tmp);
        assert_eq!(
            messages(findings.errors()),
            vec![
                "skills.json: Version '1' is not valid semver",
                "skills.json: Skill 'a' path 'missing' does not exist",
            ]
        );
    }

    #[test]
    fn test_empty_skills_array_passes() {
        let tmp = repo(r#"{"version": "1.0.0", "skills": []}"#);
        let findings = run(&tmp);
        assert!(findings.errors().is_empty());
        assert!(findings.warnings().is_empty());
    }

    #[test]
    fn test_false_skills_is_missing() {
        let tmp = repo(r#"{"version": "1.0.0", "skills": false}"#);
        let findings = run(&tmp);
        assert_eq!(
            messages(findings.errors()),
            vec!["skills.json: Missing skills object"]
        );
    }

    #[test]
    fn test_short_version() {
        let tmp = repo(r#"{"version": "1.0", "skills": {}}"#);
        let findings = run(&tmp);
        assert_eq!(
            messages(findings.errors()),
            vec!["skills.json: Version '1.0' is not valid semver"]
        );
    }

    #[test]
    fn test_missing_version_skips_format_check() {
        let tmp = repo(r#"{"skills": {}}"#);
        let findings = run(&tmp);
        assert_eq!(
            messages(findings.errors()),
            vec!["skills.json: Missing version field"]
        );
    }

    #[test]
    fn test_missing_skills_stops_early() {
        let tmp = repo(r#"{"version": "1.0"}"#);
        let findings = run(&tmp);
        assert_eq!(
            messages(findings.errors()),
            vec![
                "skills.json: Version '1.0' is not valid semver",
                "skills.json: Missing skills object",
            ]
        );
    }

    #[test]
    fn test_null_skills_is_missing() {
        let tmp = repo(r#"{"version": "1.0.0", "skills": null}"#);
        let findings = run(&tmp);
        assert_eq!(
            messages(findings.errors()),
            vec!["skills.json: Missing skills object"]
        );
    }

    #[test]
    fn test_entry_missing_path() {
        let tmp = repo(
            r#"{"version": "1.0.0", "skills": {"nopath": {"version": "bad", "category": "x"}}}"#,
        );
        let findings = run(&tmp);
        assert_eq!(
            messages(findings.errors()),
            vec!["skills.json: Skill 'nopath' missing path"]
        );
        // Remaining checks on that entry are skipped
        assert!(findings.warnings().is_empty());
    }

    #[test]
    fn test_entry_path_does_not_exist() {
        let tmp = repo(r#"{"version": "1.0.0", "skills": {"ghost": {"path": "core/ghost"}}}"#);
        let findings = run(&tmp);
        assert_eq!(
            messages(findings.errors()),
            vec!["skills.json: Skill 'ghost' path 'core/ghost' does not exist"]
        );
    }

    #[test]
    fn test_leading_slash_stays_under_root() {
        let tmp = repo(r#"{"version": "1.0.0", "skills": {"alpha": {"path": "/core/alpha"}}}"#);
        fs::create_dir_all(tmp.path().join("core/alpha")).unwrap();
        let findings = run(&tmp);
        assert!(findings.errors().is_empty());
    }

    #[test]
    fn test_entry_version_warning() {
        let tmp = repo(
            r#"{"version": "1.0.0", "skills": {"alpha": {"path": "core", "version": "2.x"}}}"#,
        );
        fs::create_dir_all(tmp.path().join("core")).unwrap();
        let findings = run(&tmp);
        assert!(findings.errors().is_empty());
        assert_eq!(
            messages(findings.warnings()),
            vec!["skills.json: Skill 'alpha' version '2.x' is not valid semver"]
        );
    }

    #[test]
    fn test_undefined_category_warning() {
        let tmp = repo(
            r#"{
                "version": "1.0.0",
                "categories": {"core": {}},
                "skills": {
                    "alpha": {"path": "core", "category": "core"},
                    "beta": {"path": "core", "category": "misc"}
                }
            }"#,
        );
        fs::create_dir_all(tmp.path().join("core")).unwrap();
        let findings = run(&tmp);
        assert!(findings.errors().is_empty());
        assert_eq!(
            messages(findings.warnings()),
            vec!["skills.json: Skill 'beta' has undefined category 'misc'"]
        );
    }

    #[test]
    fn test_category_unchecked_without_registry() {
        let tmp = repo(
            r#"{"version": "1.0.0", "skills": {"alpha": {"path": "core", "category": "misc"}}}"#,
        );
        fs::create_dir_all(tmp.path().join("core")).unwrap();
        let findings = run(&tmp);
        assert!(findings.warnings().is_empty());
    }

    #[test]
    fn test_one_bad_entry_does_not_stop_others() {
        let tmp = repo(
            r#"{"version": "1.0.0", "skills": {
                "a": {},
                "b": {"path": "missing"},
                "c": {"path": "core", "version": "1"}
            }}"#,
        );
        fs::create_dir_all(tmp.path().join("core")).unwrap();
        let findings = run(&tmp);
        assert_eq!(findings.errors().len(), 2);
        assert_eq!(findings.warnings().len(), 1);
    }

    #[test]
    fn test_mistyped_entry_among_valid_ones() {
        let tmp = repo(
            r#"{"version": "1.0", "skills": {
                "a": {"path": "missing"},
                "b": {"path": "core", "version": 2},
                "c": "core",
                "d": {"path": "core", "category": 7}
            }}"#,
        );
        fs::create_dir_all(tmp.path().join("core")).unwrap();
        let findings = run(&tmp);
        assert_eq!(
            messages(findings.errors()),
            vec![
                "skills.json: Version '1.0' is not valid semver",
                "skills.json: Skill 'a' path 'missing' does not exist",
                "skills.json: Skill 'c' entry is not valid - expected an object, found a string",
            ]
        );
        assert_eq!(
            messages(findings.warnings()),
            vec!["skills.json: Skill 'b' version '2' is not valid semver"]
        );
    }

    #[test]
    fn test_falsy_entry_fields_read_as_absent() {
        let tmp = repo(
            r#"{"version": "1.0.0", "categories": {"core": {}}, "skills": {
                "a": {"path": "core", "version": null, "category": false},
                "b": {"path": 0}
            }}"#,
        );
        fs::create_dir_all(tmp.path().join("core")).unwrap();
        let findings = run(&tmp);
        assert_eq!(
            messages(findings.errors()),
            vec!["skills.json: Skill 'b' missing path"]
        );
        assert!(findings.warnings().is_empty());
    }

    #[test]
    fn test_array_categories_by_index() {
        let tmp = repo(
            r#"{"version": "1.0.0", "categories": ["core"], "skills": {
                "a": {"path": "core", "category": "0"},
                "b": {"path": "core", "category": "core"}
            }}"#,
        );
        fs::create_dir_all(tmp.path().join("core")).unwrap();
        let findings = run(&tmp);
        assert_eq!(
            messages(findings.warnings()),
            vec!["skills.json: Skill 'b' has undefined category 'core'"]
        );
    }

    #[test]
    fn test_custom_manifest_name() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            manifest_file: "registry.json".to_string(),
            ..Config::default()
        };
        let mut findings = Findings::new();
        validate_manifest(tmp.path(), &config, &mut findings);
        assert_eq!(
            messages(findings.errors()),
            vec!["registry.json: Manifest file not found"]
        );
    }
}
