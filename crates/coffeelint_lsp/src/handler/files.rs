//! Watched files handler.

use tower_lsp::lsp_types::*;
use tracing::{debug, info};

use coffeelint_core::{is_coffeelint_config_file, is_settings_file};

use crate::config::reload_settings;
use crate::state::BackendState;

/// Handles the `workspace/didChangeWatchedFiles` notification.
///
/// Returns `true` if a lint-relevant file changed and open documents should
/// be validated again.
pub async fn handle_did_change_watched_files(
    state: &BackendState,
    params: DidChangeWatchedFilesParams,
) -> bool {
    debug!("Watched files changed: {:?}", params.changes);

    let mut settings_changed = false;
    let mut config_changed = false;
    for change in &params.changes {
        let path = change.uri.path();
        settings_changed |= is_settings_file(path);
        config_changed |= is_coffeelint_config_file(path);
    }

    if settings_changed {
        info!("Settings file changed, reloading...");
        reload_settings(state);
    }
    if config_changed {
        info!("coffeelint.json changed");
    }

    settings_changed || config_changed
}
