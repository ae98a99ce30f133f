//! CoffeeLint invocation and result interpretation.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::checkstyle::parse_report;
use crate::error::LinterError;
use crate::process::{CommandLine, ProcessRunner};
use crate::report::{Issue, Report};

/// Everything needed to run CoffeeLint against one file.
///
/// Empty strings mean "unset" for the optional fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintConfiguration {
    /// Directory the linter runs in.
    pub working_dir: PathBuf,
    /// File to lint, relative to `working_dir`.
    pub target: String,
    /// Node interpreter. Empty runs the executable directly.
    pub interpreter: String,
    /// CoffeeLint executable script.
    pub executable: String,
    /// Optional `coffeelint.json`.
    pub config_file: String,
    /// Optional custom rules directory.
    pub rules_dir: String,
}

impl LintConfiguration {
    /// Creates a configuration with only the required fields set.
    pub fn new(
        working_dir: impl Into<PathBuf>,
        target: impl Into<String>,
        interpreter: impl Into<String>,
        executable: impl Into<String>,
    ) -> Self {
        Self {
            working_dir: working_dir.into(),
            target: target.into(),
            interpreter: interpreter.into(),
            executable: executable.into(),
            config_file: String::new(),
            rules_dir: String::new(),
        }
    }

    /// Sets the config file.
    pub fn with_config_file(mut self, config_file: impl Into<String>) -> Self {
        self.config_file = config_file.into();
        self
    }

    /// Sets the custom rules directory.
    pub fn with_rules_dir(mut self, rules_dir: impl Into<String>) -> Self {
        self.rules_dir = rules_dir.into();
        self
    }

    fn base_command(&self) -> CommandLine {
        CommandLine::for_script(&self.interpreter, &self.executable, &self.working_dir)
    }

    /// Builds `<target> [-c <config>] [--rulesdir ['<rules>']]`.
    fn lint_command(&self) -> CommandLine {
        let mut command = self.base_command().arg(&self.target);
        if !self.config_file.is_empty() {
            command = command.arg("-c").arg(&self.config_file);
        }
        if !self.rules_dir.is_empty() {
            command = command
                .arg("--rulesdir")
                .arg(format!("['{}']", self.rules_dir));
        }
        command
    }
}

/// Outcome of one lint run.
///
/// A non-empty `error_output` takes precedence over the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintResult {
    /// Parsed report, if stdout was a checkstyle document.
    pub report: Option<Report>,
    /// Stderr of a failing run, or the description of a launch failure.
    pub error_output: String,
}

impl LintResult {
    /// Returns `true` if the run produced any error output, whitespace included.
    pub fn has_error(&self) -> bool {
        !self.error_output.is_empty()
    }

    /// Returns the reported issues (empty when there is no report).
    pub fn issues(&self) -> &[Issue] {
        self.report.as_ref().map(Report::issues).unwrap_or_default()
    }

    fn failed(error: &LinterError) -> Self {
        Self {
            report: None,
            error_output: error.to_string(),
        }
    }
}

/// Runs CoffeeLint and interprets its output.
#[derive(Debug, Clone, Copy, Default)]
pub struct LintRunner {
    process: ProcessRunner,
}

impl LintRunner {
    /// Creates a runner with the default timeout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a runner with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            process: ProcessRunner::with_timeout(timeout),
        }
    }

    /// Lints `config.target` with the checkstyle reporter.
    ///
    /// CoffeeLint exits 0 when the file is clean, so the report is only
    /// parsed for non-zero exits. A report that fails to parse is logged and
    /// the stderr is kept as the error output.
    pub fn lint(&self, config: &LintConfiguration) -> LintResult {
        let command = config
            .lint_command()
            .arg("--reporter")
            .arg("checkstyle");

        let outcome = match self.process.execute(&command) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("CoffeeLint run failed: {}", e);
                return LintResult::failed(&e);
            }
        };

        if outcome.success() {
            debug!("No issues in {}", config.target);
            return LintResult::default();
        }

        let report = match parse_report(&outcome.stdout) {
            Ok(report) => Some(report),
            Err(e) => {
                error!("Failed to parse CoffeeLint output for {}: {}", config.target, e);
                None
            }
        };

        LintResult {
            report,
            error_output: outcome.stderr,
        }
    }

    /// Returns the linter's version string.
    ///
    /// A missing executable yields an empty string without spawning anything,
    /// as does a non-zero exit.
    pub fn version(&self, config: &LintConfiguration) -> Result<String, LinterError> {
        if !Path::new(&config.executable).exists() {
            warn!(
                "Calling version with invalid coffeelint exe {}",
                config.executable
            );
            return Ok(String::new());
        }

        let outcome = self.process.execute(&config.base_command().arg("-v"))?;
        if outcome.success() {
            Ok(outcome.stdout.trim().to_string())
        } else {
            Ok(String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::ffi::OsString;

    fn args(command: &CommandLine) -> Vec<String> {
        command
            .args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_lint_command_minimal() {
        let config = LintConfiguration::new("/work", "src/a.coffee", "/usr/bin/node", "/bin/coffeelint");
        let command = config.lint_command();
        assert_eq!(command.program(), &OsString::from("/usr/bin/node"));
        assert_eq!(args(&command), vec!["/bin/coffeelint", "src/a.coffee"]);
    }

    #[test]
    fn test_lint_command_with_config_and_rules() {
        let config = LintConfiguration::new("/work", "a.coffee", "node", "coffeelint")
            .with_config_file("/work/coffeelint.json")
            .with_rules_dir("/work/rules");
        assert_eq!(
            args(&config.lint_command()),
            vec![
                "coffeelint",
                "a.coffee",
                "-c",
                "/work/coffeelint.json",
                "--rulesdir",
                "['/work/rules']",
            ]
        );
    }

    #[test]
    fn test_lint_command_without_interpreter() {
        let config = LintConfiguration::new("/work", "a.coffee", "", "/bin/coffeelint");
        let command = config.lint_command();
        assert_eq!(command.program(), &OsString::from("/bin/coffeelint"));
        assert_eq!(args(&command), vec!["a.coffee"]);
    }

    #[test]
    fn test_result_error_takes_precedence() {
        let result = LintResult {
            report: Some(Report::for_file("a.coffee", vec![Issue::new("r", 1, "m")])),
            error_output: "boom".to_string(),
        };
        assert!(result.has_error());
        assert_eq!(result.issues().len(), 1);
        assert!(!LintResult::default().has_error());
        assert!(LintResult::default().issues().is_empty());
    }

    #[test]
    fn test_whitespace_error_output_counts_as_error() {
        let result = LintResult {
            report: None,
            error_output: "\n".to_string(),
        };
        assert!(result.has_error());
    }

    #[test]
    fn test_launch_failure_becomes_error_output() {
        let config = LintConfiguration::new(
            std::env::temp_dir(),
            "a.coffee",
            "/definitely/not/a/node",
            "/definitely/not/coffeelint",
        );
        let result = LintRunner::new().lint(&config);
        assert!(result.has_error());
        assert!(result.report.is_none());
        assert!(result.error_output.contains("/definitely/not/a/node"));
    }

    #[test]
    fn test_version_with_missing_executable_is_empty() {
        let config = LintConfiguration::new(
            std::env::temp_dir(),
            "a.coffee",
            "/definitely/not/a/node",
            "/definitely/not/coffeelint",
        );
        assert_eq!(LintRunner::new().version(&config).unwrap(), "");
    }
}
