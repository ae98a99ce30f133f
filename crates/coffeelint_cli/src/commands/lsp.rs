//! LSP command implementation

use miette::Result;

use super::settings::resolve_settings;
use crate::cli::Cli;
use crate::utils::create_tokio_runtime;

pub fn run_lsp(cli: &Cli) -> Result<()> {
    // Without explicit settings the server discovers them in the workspace.
    let settings = if cli.has_settings_overrides() {
        Some(resolve_settings(cli)?.settings)
    } else {
        None
    };

    create_tokio_runtime()?.block_on(async {
        coffeelint_lsp::run_with_settings(settings).await;
    });
    Ok(())
}
