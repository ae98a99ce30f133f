//! Project settings for running CoffeeLint.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonschema::Validator;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::LinterError;
use crate::runner::LintConfiguration;

/// Name of the settings file looked up in the project root.
pub const SETTINGS_FILE: &str = ".coffeelint-bridge.json";

/// Name of CoffeeLint's own configuration file.
pub const COFFEELINT_CONFIG_FILE: &str = "coffeelint.json";

const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/settings.json");
static SETTINGS_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Per-project CoffeeLint settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintSettings {
    /// Whether linting is enabled.
    #[serde(default)]
    pub enabled: bool,

    /// CoffeeLint executable.
    #[serde(default)]
    pub executable: String,

    /// Node interpreter. Empty runs the executable directly.
    #[serde(default)]
    pub node_interpreter: String,

    /// `coffeelint.json` to pass with `-c`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub config_file: String,

    /// Directory of custom rules.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub custom_rules_path: String,

    /// Report every issue as a warning.
    #[serde(default)]
    pub treat_all_as_warnings: bool,
}

/// A settings value that does not point at anything usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SettingsProblem {
    /// `executable` is empty or not a file.
    InvalidExecutable,
    /// `nodeInterpreter` is set but not a file.
    InvalidInterpreter,
    /// `configFile` is set but not a file.
    InvalidConfigFile,
    /// `customRulesPath` is set but not a directory.
    InvalidRulesPath,
}

impl SettingsProblem {
    /// Returns the message shown to the user.
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidExecutable => "Path to coffeelint is invalid",
            Self::InvalidInterpreter => "Path to node interpreter is invalid",
            Self::InvalidConfigFile => "Path to coffeelint config is invalid",
            Self::InvalidRulesPath => "Path to custom rules is invalid",
        }
    }
}

impl fmt::Display for SettingsProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl LintSettings {
    /// Loads settings from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LinterError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Parses settings from JSON, validating against the embedded schema.
    pub fn from_json(json: &str) -> Result<Self, LinterError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| LinterError::config(format!("Invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Builds settings from an already parsed JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, LinterError> {
        let schema = SETTINGS_SCHEMA
            .get_or_init(|| {
                let schema_json: serde_json::Value =
                    serde_json::from_str(SCHEMA_JSON).map_err(|e| e.to_string())?;
                Validator::new(&schema_json).map_err(|e| e.to_string())
            })
            .as_ref()
            .map_err(|e| LinterError::internal(format!("Invalid settings schema: {}", e)))?;

        if let Err(e) = schema.validate(&value) {
            return Err(LinterError::config(format!(
                "Settings validation failed: {} at {}",
                e,
                e.instance_path()
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| LinterError::config(format!("Invalid settings: {}", e)))
    }

    /// Loads `.coffeelint-bridge.json` from `root` if it exists.
    pub fn discover(root: impl AsRef<Path>) -> Result<Option<Self>, LinterError> {
        let path = root.as_ref().join(SETTINGS_FILE);
        if !path.is_file() {
            debug!("No settings file at {}", path.display());
            return Ok(None);
        }
        debug!("Loading settings from {}", path.display());
        Self::from_file(&path).map(Some)
    }

    /// Checks every path setting against the file system.
    pub fn validate(&self, project_root: impl AsRef<Path>) -> Vec<SettingsProblem> {
        let root = project_root.as_ref();
        let mut problems = Vec::new();

        if self.executable.is_empty() || !resolve(root, &self.executable).is_file() {
            problems.push(SettingsProblem::InvalidExecutable);
        }
        if !self.node_interpreter.is_empty() && !resolve(root, &self.node_interpreter).is_file() {
            problems.push(SettingsProblem::InvalidInterpreter);
        }
        if !self.config_file.is_empty() && !resolve(root, &self.config_file).is_file() {
            problems.push(SettingsProblem::InvalidConfigFile);
        }
        if !self.custom_rules_path.is_empty() && !resolve(root, &self.custom_rules_path).is_dir() {
            problems.push(SettingsProblem::InvalidRulesPath);
        }

        problems
    }

    /// Returns `true` if [`validate`](Self::validate) finds no problems.
    pub fn is_valid(&self, project_root: impl AsRef<Path>) -> bool {
        self.validate(project_root).is_empty()
    }

    /// Builds the configuration for linting `target` (relative to the root).
    pub fn to_configuration(
        &self,
        project_root: impl AsRef<Path>,
        target: impl Into<String>,
    ) -> LintConfiguration {
        let root = project_root.as_ref();
        let resolved = |value: &str| {
            if value.is_empty() {
                String::new()
            } else {
                resolve(root, value).to_string_lossy().into_owned()
            }
        };

        LintConfiguration::new(
            root,
            target,
            resolved(&self.node_interpreter),
            resolved(&self.executable),
        )
        .with_config_file(resolved(&self.config_file))
        .with_rules_dir(resolved(&self.custom_rules_path))
    }
}

/// Resolves a settings path against the project root.
fn resolve(root: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Returns `true` if `path` names a CoffeeLint configuration file.
pub fn is_coffeelint_config_file(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .file_name()
        .is_some_and(|name| name == COFFEELINT_CONFIG_FILE)
}

/// Returns `true` if `path` names the settings file.
pub fn is_settings_file(path: impl AsRef<Path>) -> bool {
    path.as_ref()
        .file_name()
        .is_some_and(|name| name == SETTINGS_FILE)
}
