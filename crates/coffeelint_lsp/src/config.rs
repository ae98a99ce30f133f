//! Settings management for LSP server.

use tracing::{error, info, warn};

use coffeelint_core::{Annotator, LintSettings};

use crate::state::BackendState;

/// Reloads settings for the workspace root and rebuilds the annotator.
pub fn reload_settings(state: &BackendState) {
    let root = match state.workspace_root.read() {
        Ok(g) => match g.as_ref() {
            Some(p) => p.clone(),
            None => return,
        },
        Err(e) => {
            error!("Workspace root lock poisoned: {}", e);
            return;
        }
    };

    let overridden = match state.settings_override.read() {
        Ok(g) => g.clone(),
        Err(e) => {
            error!("Settings lock poisoned: {}", e);
            return;
        }
    };

    let settings = match overridden {
        Some(settings) => settings,
        None => match LintSettings::discover(&root) {
            Ok(Some(settings)) => {
                info!("Loaded settings from {}", root.display());
                settings
            }
            Ok(None) => {
                info!("No settings file in {}, CoffeeLint is disabled", root.display());
                LintSettings::default()
            }
            Err(e) => {
                error!("Failed to load settings: {}", e);
                LintSettings::default()
            }
        },
    };

    if settings.enabled {
        for problem in settings.validate(&root) {
            warn!("{}", problem);
        }
    }

    match state.annotator.write() {
        Ok(mut guard) => {
            *guard = Some(Annotator::new(root, settings));
            info!("Annotator re-initialized with new settings");
        }
        Err(e) => error!("Annotator lock poisoned: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coffeelint_core::SETTINGS_FILE;

    #[test]
    fn test_reload_without_root_is_noop() {
        let state = BackendState::new();
        reload_settings(&state);
        assert!(state.annotator.read().unwrap().is_none());
    }

    #[test]
    fn test_reload_discovers_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{ "enabled": true, "executable": "bin/coffeelint" }"#,
        )
        .unwrap();

        let state = BackendState::new();
        *state.workspace_root.write().unwrap() = Some(dir.path().to_path_buf());
        reload_settings(&state);

        let guard = state.annotator.read().unwrap();
        let annotator = guard.as_ref().unwrap();
        assert!(annotator.settings().enabled);
        assert_eq!(annotator.settings().executable, "bin/coffeelint");
    }

    #[test]
    fn test_override_wins_over_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), r#"{ "enabled": true }"#).unwrap();

        let state = BackendState::with_settings(Some(LintSettings::default()));
        *state.workspace_root.write().unwrap() = Some(dir.path().to_path_buf());
        reload_settings(&state);

        let guard = state.annotator.read().unwrap();
        assert!(!guard.as_ref().unwrap().settings().enabled);
    }

    #[test]
    fn test_broken_settings_file_disables_linting() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{ not json").unwrap();

        let state = BackendState::new();
        *state.workspace_root.write().unwrap() = Some(dir.path().to_path_buf());
        reload_settings(&state);

        let guard = state.annotator.read().unwrap();
        assert!(!guard.as_ref().unwrap().settings().enabled);
    }
}
