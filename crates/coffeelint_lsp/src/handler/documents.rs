//! Document lifecycle handlers (open, change, save, close).

use tower_lsp::lsp_types::*;
use tracing::{debug, error};

use crate::state::{DocumentData, SharedState};

/// Handles the `textDocument/didOpen` notification.
pub async fn handle_did_open(
    state: &SharedState,
    params: DidOpenTextDocumentParams,
) -> (Url, String, Option<i32>) {
    debug!("Document opened: {}", params.text_document.uri);

    match state.documents.write() {
        Ok(mut docs) => {
            docs.insert(
                params.text_document.uri.clone(),
                DocumentData {
                    text: params.text_document.text.clone(),
                    version: params.text_document.version,
                },
            );
        }
        Err(e) => error!("Documents lock poisoned: {}", e),
    }

    (
        params.text_document.uri,
        params.text_document.text,
        Some(params.text_document.version),
    )
}

/// Handles the `textDocument/didChange` notification.
///
/// Returns the URI, text, and version for debounced validation.
pub async fn handle_did_change(
    state: &SharedState,
    params: DidChangeTextDocumentParams,
) -> Option<(Url, String, i32)> {
    debug!("Document changed: {}", params.text_document.uri);

    // Full sync: the last change carries the whole text.
    let change = params.content_changes.into_iter().last()?;
    let uri = params.text_document.uri;
    let version = params.text_document.version;
    let text = change.text;

    {
        let mut docs = match state.documents.write() {
            Ok(guard) => guard,
            Err(e) => {
                error!("Documents lock poisoned: {}", e);
                return None;
            }
        };
        docs.insert(
            uri.clone(),
            DocumentData {
                text: text.clone(),
                version,
            },
        );
    }

    Some((uri, text, version))
}

/// Handles the `textDocument/didSave` notification.
///
/// Saved text replaces the cached text of an open document. Falls back to
/// the cached text when the client does not include it.
pub async fn handle_did_save(
    state: &SharedState,
    params: DidSaveTextDocumentParams,
) -> Option<(Url, String, Option<i32>)> {
    debug!("Document saved: {}", params.text_document.uri);

    let uri = params.text_document.uri;
    let mut docs = match state.documents.write() {
        Ok(guard) => guard,
        Err(e) => {
            error!("Documents lock poisoned: {}", e);
            return params.text.map(|text| (uri, text, None));
        }
    };

    match (params.text, docs.get_mut(&uri)) {
        (Some(text), Some(doc)) => {
            doc.text = text.clone();
            Some((uri, text, Some(doc.version)))
        }
        (Some(text), None) => Some((uri, text, None)),
        (None, Some(doc)) => Some((uri, doc.text.clone(), Some(doc.version))),
        (None, None) => None,
    }
}

/// Handles the `textDocument/didClose` notification.
pub async fn handle_did_close(state: &SharedState, params: DidCloseTextDocumentParams) -> Url {
    debug!("Document closed: {}", params.text_document.uri);

    match state.documents.write() {
        Ok(mut docs) => {
            docs.remove(&params.text_document.uri);
        }
        Err(e) => error!("Documents lock poisoned: {}", e),
    }

    params.text_document.uri
}
