//! # coffeelint_core
//!
//! Runs the external CoffeeLint linter against editor buffers and turns its
//! checkstyle output into line annotations.
//!
//! This crate provides:
//! - Process execution with streaming capture and a timeout
//! - The checkstyle report parser
//! - The `LintRunner` orchestrator
//! - Temporary materialization of unsaved buffers
//! - Mapping of issues onto document lines
//! - Rate limiting for failure notifications
//!
//! ## Example
//!
//! ```rust,ignore
//! use coffeelint_core::{AnnotationOutcome, Annotator, LintSettings};
//!
//! let settings = LintSettings::discover(".")?.unwrap_or_default();
//! let annotator = Annotator::new(".", settings);
//!
//! match annotator.annotate(Path::new("src/app.coffee"), &text) {
//!     AnnotationOutcome::Annotated(annotations) => { /* render */ }
//!     AnnotationOutcome::Failed(message) => eprintln!("{}", message),
//!     AnnotationOutcome::Skipped(_) => {}
//! }
//! ```

mod annotation;
mod annotator;
pub mod checkstyle;
mod config;
mod error;
mod line_index;
mod materializer;
mod notifier;
pub mod process;
mod report;
mod runner;

pub use annotation::{Annotation, AnnotationMapper, MESSAGE_PREFIX, display_message};
pub use annotator::{AnnotationOutcome, Annotator, SkipReason, is_coffeescript_file};
pub use checkstyle::parse_report;
pub use config::{
    COFFEELINT_CONFIG_FILE, LintSettings, SETTINGS_FILE, SettingsProblem,
    is_coffeelint_config_file, is_settings_file,
};
pub use error::LinterError;
pub use line_index::{LineIndex, TextRange};
pub use materializer::{MaterializedFile, materialize};
pub use notifier::{DEFAULT_NOTIFY_INTERVAL, DebouncedNotifier};
pub use process::{CommandLine, DEFAULT_TIMEOUT, OutputKind, ProcessOutcome, ProcessRunner};
pub use report::{Issue, Report, ReportFile, Severity};
pub use runner::{LintConfiguration, LintResult, LintRunner};
