//! Integration tests for CLI commands
//!
//! Every test runs against a private config directory and never reaches
//! the network: only dry runs, validation failures and profile commands.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Helper to run dash0 with an isolated configuration
fn dash0(config_dir: &Path, args: &[&str]) -> Output {
    dash0_with_stdin(config_dir, args, None)
}

fn dash0_with_stdin(config_dir: &Path, args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_dash0"))
        .args(args)
        .env("DASH0_CONFIG_DIR", config_dir)
        .env_remove("DASH0_API_URL")
        .env_remove("DASH0_AUTH_TOKEN")
        .env_remove("DASH0_DATASET")
        .env_remove("CLICOLOR_FORCE")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute dash0");

    let mut pipe = child.stdin.take().expect("stdin is piped");
    if let Some(input) = stdin {
        pipe.write_all(input.as_bytes()).expect("write stdin");
    }
    drop(pipe);

    child.wait_with_output().expect("Failed to wait for dash0")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

const DASHBOARD: &str = r#"kind: Dashboard
metadata:
  name: checkout
  createdAt: "2024-01-01T00:00:00Z"
  version: 3
spec:
  display:
    name: Checkout
"#;

const RULES: &str = r#"kind: CheckRule
name: r1
expression: up == 0
---
apiVersion: monitoring.coreos.com/v1
kind: PrometheusRule
metadata:
  name: api-alerts
spec:
  groups:
    - name: api
      rules:
        - alert: HighErrorRate
          expr: rate(errors[5m]) > 0.1
        - record: job:errors:rate5m
          expr: rate(errors[5m])
"#;

mod apply_command {
    use super::*;

    #[test]
    fn test_dry_run_directory() {
        let config = TempDir::new().unwrap();
        let input = TempDir::new().unwrap();
        std::fs::write(input.path().join("a-dashboard.yaml"), DASHBOARD).unwrap();
        std::fs::write(input.path().join("b-rules.yml"), RULES).unwrap();
        std::fs::write(input.path().join("notes.txt"), "not yaml").unwrap();

        let output = dash0(
            config.path(),
            &["apply", "-f", input.path().to_str().unwrap(), "--dry-run"],
        );

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        insta::assert_snapshot!(stdout(&output), @r#"
        → Dashboard "Checkout" would be applied
        → CheckRule "r1" would be applied
        → PrometheusRule "api-alerts" would be applied

        ✓ Dry run: 3 document(s) valid, nothing applied
        "#);
    }

    #[test]
    fn test_dry_run_does_not_need_connection() {
        let config = TempDir::new().unwrap();
        let output = dash0_with_stdin(
            config.path(),
            &["apply", "-f", "-", "--dry-run"],
            Some("name: inferred\nexpression: up == 0\n"),
        );

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(stdout(&output).contains("CheckRule \"inferred\" would be applied"));
    }

    #[test]
    fn test_validation_reports_every_invalid_document() {
        let config = TempDir::new().unwrap();
        let output = dash0_with_stdin(
            config.path(),
            &["apply", "-f", "-", "--dry-run"],
            Some("kind: CheckRule\nname: ok\nexpression: up\n---\nkind: Alertmanager\n---\nfoo: bar\n"),
        );

        assert_eq!(output.status.code(), Some(2));
        let err = stderr(&output);
        assert!(err.contains("validation failed with 2 errors"), "stderr: {}", err);
        assert!(err.contains("document 2: unsupported kind \"alertmanager\""));
        assert!(err.contains("document 3: missing kind"));
        assert!(stdout(&output).is_empty());
    }

    #[test]
    fn test_empty_stdin_is_rejected() {
        let config = TempDir::new().unwrap();
        let output = dash0_with_stdin(config.path(), &["apply", "-f", "-", "--dry-run"], Some(""));

        assert_eq!(output.status.code(), Some(2));
        assert!(stderr(&output).contains("no documents found in stdin"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let config = TempDir::new().unwrap();
        let missing = config.path().join("nope.yaml");
        let output = dash0(config.path(), &["apply", "-f", missing.to_str().unwrap()]);

        assert_eq!(output.status.code(), Some(5));
    }

    #[test]
    fn test_apply_without_connection_fails_before_network() {
        let config = TempDir::new().unwrap();
        let output = dash0_with_stdin(
            config.path(),
            &["apply", "-f", "-"],
            Some("kind: CheckRule\nname: r1\nexpression: up\n"),
        );

        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("no API URL configured"));
    }

    #[test]
    fn test_missing_file_flag_is_usage_error() {
        let config = TempDir::new().unwrap();
        let output = dash0(config.path(), &["apply"]);

        assert_eq!(output.status.code(), Some(64));
    }
}

mod config_command {
    use super::*;

    #[test]
    fn test_profile_lifecycle() {
        let config = TempDir::new().unwrap();

        let output = dash0(
            config.path(),
            &[
                "config",
                "profiles",
                "create",
                "prod",
                "--api-url",
                "https://api.example.com",
                "--auth-token",
                "auth_secret1234",
            ],
        );
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(config.path().join("config.yaml").exists());

        let output = dash0(config.path(), &["config", "profiles", "list"]);
        assert!(stdout(&output).contains("prod"));

        let output = dash0(config.path(), &["config", "profiles", "show"]);
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let shown = stdout(&output);
        assert!(shown.contains("****1234"));
        assert!(!shown.contains("auth_secret"));
        assert!(shown.contains("https://api.example.com"));

        let output = dash0(config.path(), &["config", "profiles", "delete", "prod"]);
        assert!(output.status.success());
        let output = dash0(config.path(), &["config", "profiles", "list"]);
        assert!(stdout(&output).contains("No profiles configured"));
    }

    #[test]
    fn test_duplicate_profile_is_rejected() {
        let config = TempDir::new().unwrap();
        let args = [
            "config",
            "profiles",
            "create",
            "dev",
            "--api-url",
            "https://a",
            "--auth-token",
            "t",
        ];

        assert!(dash0(config.path(), &args).status.success());
        let output = dash0(config.path(), &args);
        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("profile already exists: dev"));
    }

    #[test]
    fn test_select_unknown_profile() {
        let config = TempDir::new().unwrap();
        let output = dash0(config.path(), &["config", "profiles", "select", "ghost"]);

        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("profile not found: ghost"));
    }
}

mod asset_commands {
    use super::*;

    #[test]
    fn test_blank_id_is_usage_error() {
        let config = TempDir::new().unwrap();
        let output = dash0(config.path(), &["dashboards", "get", " "]);

        assert_eq!(output.status.code(), Some(64));
    }

    #[test]
    fn test_help_lists_kind_commands() {
        let config = TempDir::new().unwrap();
        let output = dash0(config.path(), &["--help"]);

        assert!(output.status.success());
        let help = stdout(&output);
        for command in ["apply", "dashboards", "check-rules", "views", "synthetic-checks", "config"] {
            assert!(help.contains(command), "missing {} in help", command);
        }
    }
}
