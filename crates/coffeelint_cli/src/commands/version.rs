//! Version command implementation

use miette::{IntoDiagnostic, Result};

use coffeelint_core::LintRunner;

use super::settings::{ResolvedSettings, resolve_settings};
use crate::cli::Cli;

pub fn run_version(cli: &Cli) -> Result<bool> {
    let ResolvedSettings { root, settings } = resolve_settings(cli)?;

    let config = settings.to_configuration(&root, "");
    let version = LintRunner::new().version(&config).into_diagnostic()?;
    println!("{}", version);

    Ok(false)
}
