//! Debouncing utilities for LSP notifications.

use std::future::Future;
use std::time::Duration;

use tower_lsp::lsp_types::Url;
use tracing::{debug, error};

use crate::state::{BackendState, SharedState};

/// Default debounce delay in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Spawns a debounced validation task.
///
/// Waits for `delay`, then validates only if the document is still at
/// `version`; a newer edit schedules its own task.
pub fn spawn_debounced_validation<F, Fut>(
    state: SharedState,
    uri: Url,
    text: String,
    version: i32,
    delay: Duration,
    validate_fn: F,
) where
    F: FnOnce(Url, String, Option<i32>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;

        if check_version(&state, &uri, version) {
            validate_fn(uri, text, Some(version)).await;
        } else {
            debug!("Skipping stale validation of {} (version {})", uri, version);
        }
    });
}

/// Checks if the document version is still current.
pub(crate) fn check_version(state: &BackendState, uri: &Url, version: i32) -> bool {
    let docs = match state.documents.read() {
        Ok(g) => g,
        Err(e) => {
            error!("Documents lock poisoned: {}", e);
            return false;
        }
    };

    docs.get(uri)
        .map(|doc| doc.version == version)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::DocumentData;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn state_with(uri: &Url, version: i32) -> SharedState {
        let state = Arc::new(BackendState::new());
        state.documents.write().unwrap().insert(
            uri.clone(),
            DocumentData {
                text: String::new(),
                version,
            },
        );
        state
    }

    #[test]
    fn test_check_version() {
        let uri = Url::parse("file:///p/a.coffee").unwrap();
        let state = state_with(&uri, 3);

        assert!(check_version(&state, &uri, 3));
        assert!(!check_version(&state, &uri, 2));
        assert!(!check_version(
            &state,
            &Url::parse("file:///p/b.coffee").unwrap(),
            3
        ));
    }

    #[tokio::test]
    async fn test_only_latest_version_validates() {
        let uri = Url::parse("file:///p/a.coffee").unwrap();
        let state = state_with(&uri, 1);
        let calls = Arc::new(AtomicUsize::new(0));

        for version in 1..=3 {
            if let Some(doc) = state.documents.write().unwrap().get_mut(&uri) {
                doc.version = version;
            }
            let calls = Arc::clone(&calls);
            spawn_debounced_validation(
                Arc::clone(&state),
                uri.clone(),
                format!("x = {}", version),
                version,
                Duration::from_millis(50),
                move |_, text, _| async move {
                    assert_eq!(text, "x = 3");
                    calls.fetch_add(1, Ordering::SeqCst);
                },
            );
        }

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
