//! The whole annotation pipeline for one document.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error};

use crate::annotation::{Annotation, AnnotationMapper};
use crate::config::LintSettings;
use crate::error::LinterError;
use crate::line_index::LineIndex;
use crate::materializer::materialize;
use crate::runner::LintRunner;

/// File extensions treated as CoffeeScript.
pub const COFFEESCRIPT_EXTENSIONS: &[&str] = &["coffee", "litcoffee"];

/// Why a document was not linted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// Not a CoffeeScript file.
    NotCoffeeScript,
    /// Content is empty or whitespace only.
    EmptyContent,
    /// Linting is disabled in the settings.
    Disabled,
    /// The settings point at missing files.
    InvalidSettings,
}

/// Result of annotating one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "camelCase")]
pub enum AnnotationOutcome {
    /// Linting did not run.
    Skipped(SkipReason),
    /// Linting ran; the annotations may be empty.
    Annotated(Vec<Annotation>),
    /// Linting failed; the text is meant for the user.
    Failed(String),
}

/// Returns `true` for `.coffee`, `.litcoffee` and `Cakefile`.
pub fn is_coffeescript_file(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    if path.file_name().is_some_and(|name| name == "Cakefile") {
        return true;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| COFFEESCRIPT_EXTENSIONS.contains(&ext))
}

/// Runs gating, materialization, linting and mapping for documents of one
/// project.
#[derive(Debug, Clone)]
pub struct Annotator {
    project_root: PathBuf,
    settings: LintSettings,
    runner: LintRunner,
}

impl Annotator {
    /// Creates an annotator with the default runner.
    pub fn new(project_root: impl Into<PathBuf>, settings: LintSettings) -> Self {
        Self::with_runner(project_root, settings, LintRunner::new())
    }

    /// Creates an annotator with a custom runner.
    pub fn with_runner(
        project_root: impl Into<PathBuf>,
        settings: LintSettings,
        runner: LintRunner,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            settings,
            runner,
        }
    }

    /// Project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Current settings.
    pub fn settings(&self) -> &LintSettings {
        &self.settings
    }

    /// Checks whether `content` of `path` should be linted at all.
    pub fn gate(&self, path: &Path, content: &str) -> Option<SkipReason> {
        if !is_coffeescript_file(path) {
            return Some(SkipReason::NotCoffeeScript);
        }
        if content.trim().is_empty() {
            return Some(SkipReason::EmptyContent);
        }
        if !self.settings.enabled {
            return Some(SkipReason::Disabled);
        }
        if !self.settings.is_valid(&self.project_root) {
            return Some(SkipReason::InvalidSettings);
        }
        None
    }

    /// Lints the in-memory `content` of the file at `path`.
    pub fn annotate(&self, path: &Path, content: &str) -> AnnotationOutcome {
        if let Some(reason) = self.gate(path, content) {
            debug!("Skipping {}: {:?}", path.display(), reason);
            return AnnotationOutcome::Skipped(reason);
        }

        match self.run(path, content) {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Error running CoffeeLint inspection: {}", e);
                AnnotationOutcome::Failed(format!("Error running CoffeeLint inspection: {}", e))
            }
        }
    }

    fn run(&self, path: &Path, content: &str) -> Result<AnnotationOutcome, LinterError> {
        let result = {
            let file = materialize(&self.project_root, path, content)?;
            let relative = file.relative_path()?;
            let config = self.settings.to_configuration(&self.project_root, relative);
            self.runner.lint(&config)
        };

        if result.has_error() {
            return Ok(AnnotationOutcome::Failed(result.error_output));
        }

        let lines = LineIndex::new(content);
        let annotations = result
            .report
            .as_ref()
            .map(|report| {
                AnnotationMapper::new(self.settings.treat_all_as_warnings).map_report(report, &lines)
            })
            .unwrap_or_default();
        Ok(AnnotationOutcome::Annotated(annotations))
    }
}
