//! Integration tests for CLI behavior
//!
//! These tests verify the external behavior of the CLI tool against a fake
//! `coffeelint` shell script.

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to create a command for the cflint CLI
fn cflint_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_cflint"))
}

mod help_command {
    use super::*;

    #[test]
    fn shows_help_with_flag() {
        cflint_cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }

    #[test]
    fn shows_version_with_flag() {
        cflint_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}

mod check_settings_command {
    use super::*;
    use std::fs;

    #[test]
    fn reports_invalid_paths() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".coffeelint-bridge.json"),
            r#"{ "enabled": true, "executable": "missing/coffeelint", "configFile": "nope.json" }"#,
        )
        .unwrap();

        cflint_cmd()
            .current_dir(dir.path())
            .arg("check-settings")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("Path to coffeelint is invalid"))
            .stdout(predicate::str::contains("Path to coffeelint config is invalid"));
    }

    #[test]
    fn accepts_valid_settings() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("coffeelint"), "").unwrap();

        cflint_cmd()
            .arg("--project-root")
            .arg(dir.path())
            .arg("--executable")
            .arg("coffeelint")
            .arg("check-settings")
            .assert()
            .success()
            .stdout(predicate::str::contains("Settings are valid"));
    }

    #[test]
    fn rejects_settings_that_fail_schema() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("settings.json");
        fs::write(&settings, r#"{ "enabled": "yes" }"#).unwrap();

        cflint_cmd()
            .arg("--settings")
            .arg(&settings)
            .arg("check-settings")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Settings validation failed"));
    }
}

#[cfg(unix)]
mod lint_command {
    use super::*;
    use std::fs;
    use std::path::Path;

    const REPORT_SCRIPT: &str = r#"cat <<EOF
<checkstyle version="4.3"><file name="$1">
<error line="1" column="3" severity="error" message="Line exceeds maximum allowed length" source="max_line_length"/>
<error line="2" severity="warning" message="Trailing whitespace" source="no_trailing_whitespace"/>
</file></checkstyle>
EOF
exit 1
"#;

    fn project(script: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("coffeelint"), script).unwrap();
        fs::write(
            dir.path().join(".coffeelint-bridge.json"),
            r#"{ "enabled": true, "executable": "coffeelint", "nodeInterpreter": "/bin/sh" }"#,
        )
        .unwrap();
        fs::write(dir.path().join("app.coffee"), "x = 1\ny = 2 \n").unwrap();
        dir
    }

    fn lint_in(dir: &Path) -> Command {
        let mut cmd = cflint_cmd();
        cmd.current_dir(dir).arg("lint").arg("app.coffee");
        cmd
    }

    #[test]
    fn reports_issues_as_text() {
        let dir = project(REPORT_SCRIPT);

        lint_in(dir.path())
            .assert()
            .code(1)
            .stdout(predicate::str::contains("app.coffee:"))
            .stdout(predicate::str::contains(
                "1:3 error [max_line_length]: CoffeeLint: Line exceeds maximum allowed length (max_line_length)",
            ))
            .stdout(predicate::str::contains("2:0 warning [no_trailing_whitespace]"))
            .stdout(predicate::str::contains("Checked 1 files, found 2 issues"));
    }

    #[test]
    fn warnings_only_exit_successfully() {
        let dir = project(REPORT_SCRIPT);

        lint_in(dir.path())
            .arg("--treat-as-warnings")
            .assert()
            .success()
            .stdout(predicate::str::contains("1:3 warning [max_line_length]"));
    }

    #[test]
    fn reports_issues_as_json() {
        let dir = project(REPORT_SCRIPT);

        let output = lint_in(dir.path())
            .arg("--format")
            .arg("json")
            .output()
            .unwrap();
        assert_eq!(output.status.code(), Some(1));

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let file = &json[0];
        assert_eq!(file["path"], "app.coffee");
        assert_eq!(file["outcome"]["status"], "annotated");
        assert_eq!(file["outcome"]["value"][0]["source"], "max_line_length");
        assert_eq!(file["outcome"]["value"][0]["range"]["start"], 0);
        assert_eq!(file["outcome"]["value"][0]["range"]["end"], 5);
        assert_eq!(file["outcome"]["value"][1]["severity"], "warning");
    }

    #[test]
    fn clean_file_exits_successfully() {
        let dir = project("exit 0\n");

        lint_in(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("Checked 1 files, found 0 issues"));
    }

    #[test]
    fn linter_failure_is_reported() {
        let dir = project("echo 'Error: Cannot find module' >&2\nexit 1\n");

        lint_in(dir.path())
            .assert()
            .code(1)
            .stdout(predicate::str::contains("failed: Error: Cannot find module"))
            .stdout(predicate::str::contains("1 failed"));
    }

    #[test]
    fn disabled_settings_skip_linting() {
        let dir = project(REPORT_SCRIPT);
        fs::write(dir.path().join(".coffeelint-bridge.json"), "{}").unwrap();

        lint_in(dir.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("found 0 issues"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = project(REPORT_SCRIPT);

        cflint_cmd()
            .current_dir(dir.path())
            .arg("lint")
            .arg("missing.coffee")
            .assert()
            .code(2)
            .stderr(predicate::str::contains("Failed to read"));
    }
}

#[cfg(unix)]
mod version_command {
    use super::*;
    use std::fs;

    #[test]
    fn prints_linter_version() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("coffeelint"), "echo '2.1.0'\n").unwrap();

        cflint_cmd()
            .current_dir(dir.path())
            .arg("version")
            .arg("--executable")
            .arg("coffeelint")
            .arg("--node")
            .arg("/bin/sh")
            .assert()
            .success()
            .stdout(predicate::str::diff("2.1.0\n"));
    }

    #[test]
    fn missing_linter_prints_empty_version() {
        let dir = tempfile::tempdir().unwrap();

        cflint_cmd()
            .current_dir(dir.path())
            .arg("version")
            .arg("--executable")
            .arg("coffeelint")
            .assert()
            .success()
            .stdout(predicate::str::diff("\n"));
    }
}
