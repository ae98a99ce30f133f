//! CoffeeLint LSP Server
//!
//! Language Server Protocol front end for `coffeelint_core`. Lints open
//! CoffeeScript documents on open, save and (debounced) change, and reports
//! linter failures through rate-limited `window/showMessage` warnings.

mod config;
pub mod conversion;
mod debounce;
mod handler;
mod state;

use std::sync::Arc;
use std::time::Duration;

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};
use tracing::{debug, error, info};

use coffeelint_core::{AnnotationOutcome, LintSettings};

use crate::conversion::to_lsp_diagnostic;
use crate::debounce::{DEFAULT_DEBOUNCE_MS, spawn_debounced_validation};
use crate::state::{BackendState, SharedState};

/// The LSP backend for CoffeeLint.
#[derive(Clone)]
pub struct Backend {
    /// LSP client for sending notifications.
    client: Client,
    /// Shared state
    state: SharedState,
}

impl Backend {
    /// Creates a new backend that reads settings from the workspace.
    pub fn new(client: Client) -> Self {
        Self::with_settings(client, None)
    }

    /// Creates a backend whose settings override the workspace settings file.
    pub fn with_settings(client: Client, settings: Option<LintSettings>) -> Self {
        Self {
            client,
            state: Arc::new(BackendState::with_settings(settings)),
        }
    }

    /// Validates a document and publishes diagnostics.
    async fn validate_document(&self, uri: Url, text: String, version: Option<i32>) {
        debug!("Validating document: {}", uri);

        let path = match uri.to_file_path() {
            Ok(p) => p,
            Err(_) => {
                debug!("Skipping validation for non-file URI: {}", uri);
                return;
            }
        };

        let outcome = self.lint_text(text.clone(), path).await;

        let diagnostics = match outcome {
            AnnotationOutcome::Annotated(annotations) => annotations
                .iter()
                .filter_map(|a| to_lsp_diagnostic(a, &text))
                .collect(),
            AnnotationOutcome::Skipped(reason) => {
                debug!("Not linting {}: {:?}", uri, reason);
                Vec::new()
            }
            AnnotationOutcome::Failed(message) => {
                self.notify_failure(&message).await;
                Vec::new()
            }
        };

        self.client
            .publish_diagnostics(uri, diagnostics, version)
            .await;
    }

    /// Runs the annotation pipeline off the async runtime.
    async fn lint_text(&self, text: String, path: std::path::PathBuf) -> AnnotationOutcome {
        let annotator = match self.state.annotator.read() {
            Ok(guard) => guard.clone(),
            Err(e) => {
                error!("Annotator lock poisoned: {}", e);
                None
            }
        };

        let Some(annotator) = annotator else {
            debug!("Annotator not available, skipping linting");
            return AnnotationOutcome::Annotated(Vec::new());
        };

        match tokio::task::spawn_blocking(move || annotator.annotate(&path, &text)).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("Lint task failed: {}", e);
                AnnotationOutcome::Annotated(Vec::new())
            }
        }
    }

    /// Shows a linter failure, at most once per notification interval.
    async fn notify_failure(&self, message: &str) {
        if self.state.notifier.try_acquire() {
            self.client
                .show_message(MessageType::WARNING, message.trim())
                .await;
        } else {
            debug!("Suppressed CoffeeLint failure notification: {}", message.trim());
        }
    }

    /// Validates every open document again.
    async fn revalidate_open_documents(&self) {
        for (uri, doc) in self.state.open_documents() {
            self.validate_document(uri, doc.text, Some(doc.version)).await;
        }
    }
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        handler::handle_initialize(&self.state, params).await
    }

    async fn initialized(&self, _: InitializedParams) {
        handler::handle_initialized(&self.client).await;
    }

    async fn shutdown(&self) -> Result<()> {
        handler::handle_shutdown().await
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let (uri, text, version) = handler::handle_did_open(&self.state, params).await;
        self.validate_document(uri, text, version).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let Some((uri, text, version)) = handler::handle_did_change(&self.state, params).await
        else {
            return;
        };

        let backend = self.clone();
        spawn_debounced_validation(
            self.state.clone(),
            uri,
            text,
            version,
            Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            move |uri, text, version| async move {
                backend.validate_document(uri, text, version).await;
            },
        );
    }

    async fn did_save(&self, params: DidSaveTextDocumentParams) {
        if let Some((uri, text, version)) = handler::handle_did_save(&self.state, params).await {
            self.validate_document(uri, text, version).await;
        }
    }

    async fn did_change_watched_files(&self, params: DidChangeWatchedFilesParams) {
        if handler::handle_did_change_watched_files(&self.state, params).await {
            self.revalidate_open_documents().await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = handler::handle_did_close(&self.state, params).await;

        // Clear diagnostics
        self.client.publish_diagnostics(uri, vec![], None).await;
    }
}

/// Starts the LSP server on stdio.
///
/// This function does not return unless an error occurs or the server shuts down.
pub async fn run() {
    run_with_settings(None).await;
}

/// Starts the LSP server on stdio with fixed settings.
pub async fn run_with_settings(settings: Option<LintSettings>) {
    info!("CoffeeLint LSP server starting...");

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| Backend::with_settings(client, settings));
    Server::new(stdin, stdout, socket).serve(service).await;
}
