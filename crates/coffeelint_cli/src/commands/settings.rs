//! Settings resolution and the check-settings command

use std::path::PathBuf;

use miette::{IntoDiagnostic, Result};
use tracing::{debug, info};

use coffeelint_core::LintSettings;

use crate::cli::Cli;

/// Settings and the root they resolve against.
pub struct ResolvedSettings {
    pub root: PathBuf,
    pub settings: LintSettings,
}

/// Loads settings from `--settings`, the project root, or defaults, then
/// applies command-line overrides.
pub fn resolve_settings(cli: &Cli) -> Result<ResolvedSettings> {
    let root = match &cli.project_root {
        Some(root) => root.clone(),
        None => std::env::current_dir().into_diagnostic()?,
    };

    let mut settings = match &cli.settings {
        Some(path) => LintSettings::from_file(path).into_diagnostic()?,
        None => match LintSettings::discover(&root).into_diagnostic()? {
            Some(settings) => settings,
            None => {
                debug!("No settings file in {}", root.display());
                LintSettings::default()
            }
        },
    };

    if let Some(executable) = &cli.executable {
        settings.executable = executable.clone();
        settings.enabled = true;
    }
    if let Some(node) = &cli.node {
        settings.node_interpreter = node.clone();
    }
    if let Some(config_file) = &cli.config_file {
        settings.config_file = config_file.clone();
    }
    if let Some(rules_dir) = &cli.rules_dir {
        settings.custom_rules_path = rules_dir.clone();
    }
    if cli.treat_as_warnings {
        settings.treat_all_as_warnings = true;
    }

    Ok(ResolvedSettings { root, settings })
}

/// Prints every settings problem. Returns `true` if there were any.
pub fn run_check_settings(cli: &Cli) -> Result<bool> {
    let ResolvedSettings { root, settings } = resolve_settings(cli)?;

    let problems = settings.validate(&root);
    if problems.is_empty() {
        println!("Settings are valid");
    } else {
        for problem in &problems {
            println!("{}", problem);
        }
    }

    if !settings.enabled {
        info!("CoffeeLint is disabled in the settings");
    }

    Ok(!problems.is_empty())
}
