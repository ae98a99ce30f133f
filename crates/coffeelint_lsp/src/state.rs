//! LSP Backend state management.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use tower_lsp::lsp_types::Url;

use coffeelint_core::{Annotator, DebouncedNotifier, LintSettings};

/// Document content and version cache.
#[derive(Debug, Clone)]
pub(crate) struct DocumentData {
    pub text: String,
    pub version: i32,
}

/// Shared backend state.
pub(crate) struct BackendState {
    /// Document contents cache.
    pub documents: RwLock<HashMap<Url, DocumentData>>,
    /// Annotation pipeline (None until a workspace root is known).
    pub annotator: RwLock<Option<Annotator>>,
    /// Workspace root path.
    pub workspace_root: RwLock<Option<PathBuf>>,
    /// Settings that take precedence over the discovered settings file.
    pub settings_override: RwLock<Option<LintSettings>>,
    /// Limits failure popups.
    pub notifier: DebouncedNotifier,
}

impl fmt::Debug for BackendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendState")
            .field("documents", &"<HashMap<Url, DocumentData>>")
            .field("annotator", &self.annotator)
            .field("workspace_root", &self.workspace_root)
            .field("notifier", &self.notifier)
            .finish()
    }
}

impl BackendState {
    /// Creates a new empty state.
    pub fn new() -> Self {
        Self::with_settings(None)
    }

    /// Creates a state whose settings are fixed up front.
    pub fn with_settings(settings: Option<LintSettings>) -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
            annotator: RwLock::new(None),
            workspace_root: RwLock::new(None),
            settings_override: RwLock::new(settings),
            notifier: DebouncedNotifier::new(),
        }
    }

    /// Returns a snapshot of every open document.
    pub fn open_documents(&self) -> Vec<(Url, DocumentData)> {
        match self.documents.read() {
            Ok(docs) => docs
                .iter()
                .map(|(uri, doc)| (uri.clone(), doc.clone()))
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Default for BackendState {
    fn default() -> Self {
        Self::new()
    }
}

/// Type alias for shared state.
pub type SharedState = Arc<BackendState>;
