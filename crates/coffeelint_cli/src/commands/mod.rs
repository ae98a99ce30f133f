//! Subcommand implementations

mod lint;
mod lsp;
mod settings;
mod version;

pub use lint::run_lint;
pub use lsp::run_lsp;
pub use settings::run_check_settings;
pub use version::run_version;
