//! Initialize and shutdown handlers.

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tracing::{debug, error, info};

use coffeelint_core::{COFFEELINT_CONFIG_FILE, LintSettings, SETTINGS_FILE};

use crate::config::reload_settings;
use crate::state::BackendState;

/// Handles the `initialize` LSP request.
pub async fn handle_initialize(
    state: &BackendState,
    params: InitializeParams,
) -> Result<InitializeResult> {
    info!("CoffeeLint LSP server initializing...");

    if let Some(options) = params.initialization_options.filter(|v| !v.is_null()) {
        match LintSettings::from_value(options) {
            Ok(settings) => match state.settings_override.write() {
                Ok(mut guard) => *guard = Some(settings),
                Err(e) => error!("Settings lock poisoned: {}", e),
            },
            Err(e) => error!("Ignoring initialization options: {}", e),
        }
    }

    #[allow(deprecated)]
    let root = params
        .root_uri
        .or_else(|| {
            params
                .workspace_folders
                .as_ref()
                .and_then(|folders| folders.first())
                .map(|folder| folder.uri.clone())
        })
        .and_then(|u| u.to_file_path().ok());

    if let Some(path) = root {
        match state.workspace_root.write() {
            Ok(mut root) => {
                *root = Some(path);
            }
            Err(e) => {
                error!("Workspace root lock poisoned: {}", e);
                return Ok(InitializeResult::default());
            }
        }

        reload_settings(state);
    }

    Ok(InitializeResult {
        capabilities: ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::FULL),
                    save: Some(TextDocumentSyncSaveOptions::SaveOptions(SaveOptions {
                        include_text: Some(true),
                    })),
                    ..Default::default()
                },
            )),
            ..Default::default()
        },
        server_info: Some(ServerInfo {
            name: "coffeelint-lsp".to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        }),
    })
}

/// Handles the `initialized` LSP notification.
pub async fn handle_initialized(client: &tower_lsp::Client) {
    client
        .log_message(MessageType::INFO, "CoffeeLint LSP server initialized!")
        .await;

    // The client answers asynchronously; do not hold up the notification.
    let client = client.clone();
    tokio::spawn(async move {
        let watchers = [COFFEELINT_CONFIG_FILE, SETTINGS_FILE]
            .iter()
            .map(|name| FileSystemWatcher {
                glob_pattern: GlobPattern::String(format!("**/{}", name)),
                kind: None,
            })
            .collect();
        let options = DidChangeWatchedFilesRegistrationOptions { watchers };
        let registration = Registration {
            id: "coffeelint-watched-files".to_string(),
            method: "workspace/didChangeWatchedFiles".to_string(),
            register_options: serde_json::to_value(options).ok(),
        };
        if let Err(e) = client.register_capability(vec![registration]).await {
            debug!("Client did not accept file watchers: {}", e);
        }
    });
}

/// Handles the `shutdown` LSP request.
pub async fn handle_shutdown() -> Result<()> {
    info!("CoffeeLint LSP server shutting down...");
    Ok(())
}
