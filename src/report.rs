//! Validation findings and the stdout report.
//!
//! A single [`Findings`] collector is threaded through the walker, the skill
//! validator and the manifest validator for one run.

use std::fmt;

/// Header line printed before anything else
pub const HEADER: &str = "Validating skills repository...";
/// Final line printed when no errors were recorded
pub const SUCCESS: &str = "All validations passed!";

/// Finding severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fails the run
    Error,
    /// Advisory only
    Warning,
}

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Accumulated findings for one validation run
#[derive(Debug, Default)]
pub struct Findings {
    errors: Vec<Finding>,
    warnings: Vec<Finding>,
    validated: usize,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error
    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "error recorded");
        self.errors.push(Finding {
            severity: Severity::Error,
            message,
        });
    }

    /// Record a warning
    pub fn warning(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(%message, "warning recorded");
        self.warnings.push(Finding {
            severity: Severity::Warning,
            message,
        });
    }

    /// Count one structurally valid skill
    pub fn mark_validated(&mut self) {
        self.validated += 1;
    }

    pub fn errors(&self) -> &[Finding] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Finding] {
        &self.warnings
    }

    pub fn validated(&self) -> usize {
        self.validated
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Process exit status: 1 if any error was recorded
    pub fn exit_code(&self) -> i32 {
        if self.has_errors() {
            1
        } else {
            0
        }
    }

    /// Render the stdout report
    pub fn render(&self) -> String {
        let mut lines = vec![HEADER.to_string(), String::new()];
        lines.push(format!("Validated {} skills", self.validated));
        lines.push(String::new());

        render_block(&mut lines, "Warnings:", &self.warnings);
        render_block(&mut lines, "Errors:", &self.errors);

        if !self.has_errors() {
            lines.push(SUCCESS.to_string());
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}

fn render_block(lines: &mut Vec<String>, title: &str, findings: &[Finding]) {
    if findings.is_empty() {
        return;
    }
    lines.push(title.to_string());
    for finding in findings {
        lines.push(format!("  - {}", finding));
    }
    lines.push(String::new());
}
