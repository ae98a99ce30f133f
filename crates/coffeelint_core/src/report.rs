//! Checkstyle report model.

use serde::{Deserialize, Serialize};

/// Severity level for an issue.
///
/// CoffeeLint reports free-form severity strings; only `"error"` is an error,
/// every other value is a warning.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - must be fixed.
    #[default]
    Error,
    /// Warning - should be reviewed.
    Warning,
}

impl Severity {
    /// Classifies a severity attribute. A missing attribute counts as an error.
    pub fn from_attribute(value: Option<&str>) -> Self {
        match value {
            None | Some("error") => Severity::Error,
            Some(_) => Severity::Warning,
        }
    }

    /// Returns the lowercase name used in reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// A single `<error>` entry of a checkstyle report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// The rule that produced the issue.
    pub source: String,
    /// 1-based line as reported by the linter (0 when absent).
    pub line: i32,
    /// 1-based column as reported by the linter (0 when absent).
    pub column: i32,
    /// Severity level.
    pub severity: Severity,
    /// The issue message.
    pub message: String,
}

impl Issue {
    /// Creates an error-severity issue with no column.
    pub fn new(source: impl Into<String>, line: i32, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            line,
            column: 0,
            severity: Severity::Error,
            message: message.into(),
        }
    }

    /// Sets the column.
    pub fn with_column(mut self, column: i32) -> Self {
        self.column = column;
        self
    }

    /// Sets the severity level.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// The `<file>` element of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportFile {
    /// File name as the linter saw it.
    pub name: String,
    /// Issues in the order the linter emitted them.
    pub issues: Vec<Issue>,
}

/// A parsed checkstyle report for one linted file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Report format version, if the root carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// The single file section, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<ReportFile>,
}

impl Report {
    /// Creates a report for a single file.
    pub fn for_file(name: impl Into<String>, issues: Vec<Issue>) -> Self {
        Self {
            version: None,
            file: Some(ReportFile {
                name: name.into(),
                issues,
            }),
        }
    }

    /// Returns the linted file name, or `""` when the report has no file.
    pub fn file_name(&self) -> &str {
        self.file.as_ref().map(|f| f.name.as_str()).unwrap_or("")
    }

    /// Returns the issues, empty when the report has no file.
    pub fn issues(&self) -> &[Issue] {
        self.file.as_ref().map(|f| f.issues.as_slice()).unwrap_or(&[])
    }

    /// Returns `true` if any issue has error severity.
    pub fn has_errors(&self) -> bool {
        self.issues().iter().any(|i| i.severity == Severity::Error)
    }
}
