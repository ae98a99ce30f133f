//! Lint command implementation

use std::fs;
use std::path::PathBuf;

use miette::{IntoDiagnostic, Result, miette};
use tracing::{info, warn};

use coffeelint_core::{AnnotationOutcome, Annotator, SkipReason};

use super::settings::{ResolvedSettings, resolve_settings};
use crate::cli::{Cli, OutputFormat};
use crate::output::{FileReport, output_results};

pub fn run_lint(cli: &Cli, files: &[PathBuf], format: OutputFormat) -> Result<bool> {
    let ResolvedSettings { root, settings } = resolve_settings(cli)?;

    if !settings.enabled {
        warn!("CoffeeLint is disabled; pass --executable or enable it in the settings file");
    } else {
        for problem in settings.validate(&root) {
            warn!("{}", problem);
        }
    }

    let annotator = Annotator::new(&root, settings);
    let mut reports = Vec::with_capacity(files.len());

    for file in files {
        let path = std::path::absolute(file).into_diagnostic()?;
        let content = fs::read_to_string(&path)
            .map_err(|e| miette!("Failed to read {}: {}", path.display(), e))?;

        let outcome = annotator.annotate(&path, &content);
        if let AnnotationOutcome::Skipped(reason) = &outcome
            && *reason != SkipReason::EmptyContent
        {
            info!("Skipped {}: {:?}", path.display(), reason);
        }

        reports.push(FileReport {
            path: file.clone(),
            outcome,
        });
    }

    output_results(&reports, format)
}
