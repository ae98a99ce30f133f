//! Projection of report issues onto document ranges.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::line_index::{LineIndex, TextRange};
use crate::report::{Issue, Report, Severity};

/// Prefix of every annotation message.
pub const MESSAGE_PREFIX: &str = "CoffeeLint: ";

/// A highlight ready to be rendered by an editor surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Byte range in the document.
    pub range: TextRange,
    /// Zero-based line the range covers.
    pub line: usize,
    /// Column reported by the linter (1-based, 0 when unknown).
    pub column: i32,
    /// Effective severity.
    pub severity: Severity,
    /// Rule identifier.
    pub source: String,
    /// Display message.
    pub message: String,
}

/// Maps issues onto the lines of the current document.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationMapper {
    treat_all_as_warnings: bool,
}

impl AnnotationMapper {
    /// Creates a mapper. With `treat_all_as_warnings` every annotation is a warning.
    pub fn new(treat_all_as_warnings: bool) -> Self {
        Self {
            treat_all_as_warnings,
        }
    }

    /// Maps every issue of `report` that still fits the document.
    pub fn map_report(&self, report: &Report, lines: &LineIndex) -> Vec<Annotation> {
        report
            .issues()
            .iter()
            .filter_map(|issue| self.map_issue(issue, lines))
            .collect()
    }

    /// Maps a single issue. Issues pointing outside the document are dropped.
    ///
    /// The range spans the whole line; the column is kept for display only.
    pub fn map_issue(&self, issue: &Issue, lines: &LineIndex) -> Option<Annotation> {
        let line = usize::try_from(issue.line.checked_sub(1)?).ok()?;
        let Some(range) = lines.line_range(line) else {
            debug!(
                "Dropping stale issue '{}' at line {} ({} lines in document)",
                issue.source,
                issue.line,
                lines.line_count()
            );
            return None;
        };

        Some(Annotation {
            range,
            line,
            column: issue.column,
            severity: self.severity(issue),
            source: issue.source.clone(),
            message: display_message(issue),
        })
    }

    /// Returns the severity an issue is rendered with.
    pub fn severity(&self, issue: &Issue) -> Severity {
        if self.treat_all_as_warnings {
            Severity::Warning
        } else {
            issue.severity
        }
    }
}

/// Formats the message shown for an issue.
pub fn display_message(issue: &Issue) -> String {
    format!(
        "{}{} ({})",
        MESSAGE_PREFIX,
        issue.message.trim(),
        issue.source
    )
}
