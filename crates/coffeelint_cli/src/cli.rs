//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// cflint - run CoffeeLint and report its findings
#[derive(Parser)]
#[command(name = "cflint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file path (defaults to .coffeelint-bridge.json in the project root)
    #[arg(short, long, global = true)]
    pub settings: Option<PathBuf>,

    /// Project root (defaults to the current directory)
    #[arg(long, global = true)]
    pub project_root: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the coffeelint executable (enables linting)
    #[arg(long, global = true)]
    pub executable: Option<String>,

    /// Path to the node interpreter
    #[arg(long, global = true)]
    pub node: Option<String>,

    /// coffeelint.json to use
    #[arg(long, global = true)]
    pub config_file: Option<String>,

    /// Directory of custom rules
    #[arg(long, global = true)]
    pub rules_dir: Option<String>,

    /// Report every issue as a warning
    #[arg(long, global = true)]
    pub treat_as_warnings: bool,
}

impl Cli {
    /// Returns `true` if any settings were given on the command line.
    pub fn has_settings_overrides(&self) -> bool {
        self.settings.is_some()
            || self.executable.is_some()
            || self.node.is_some()
            || self.config_file.is_some()
            || self.rules_dir.is_some()
            || self.treat_as_warnings
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint files
    Lint {
        /// Files to lint
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Print the coffeelint version
    Version,

    /// Check that the settings point at usable files
    CheckSettings,

    /// Start the LSP server
    Lsp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
