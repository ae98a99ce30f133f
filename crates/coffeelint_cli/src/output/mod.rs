//! Output formatting module

mod json;
mod text;

use std::path::PathBuf;

use miette::Result;

use coffeelint_core::{AnnotationOutcome, Severity};

use crate::cli::OutputFormat;

/// Lint outcome for one file, as given on the command line.
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: AnnotationOutcome,
}

impl FileReport {
    /// Returns `true` for error annotations and failed runs.
    pub fn has_errors(&self) -> bool {
        match &self.outcome {
            AnnotationOutcome::Annotated(annotations) => {
                annotations.iter().any(|a| a.severity == Severity::Error)
            }
            AnnotationOutcome::Failed(_) => true,
            AnnotationOutcome::Skipped(_) => false,
        }
    }
}

pub fn output_results(reports: &[FileReport], format: OutputFormat) -> Result<bool> {
    let has_errors = reports.iter().any(FileReport::has_errors);

    match format {
        OutputFormat::Json => json::output_json(reports)?,
        OutputFormat::Text => text::output_text(reports),
    }

    Ok(has_errors)
}
