//! Integration tests for CLI argument handling
//!
//! Only paths that exit before the terminal UI starts are exercised here.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_userlist"))
        .args(args)
        .output()
        .expect("Failed to execute userlist")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("userlist"), "Help should mention userlist");
    assert!(stdout.contains("--endpoint"), "Help should mention --endpoint");
    assert!(stdout.contains("--cache-dir"), "Help should mention --cache-dir");
    assert!(stdout.contains("--clear-cache"), "Help should mention --clear-cache");
}

#[test]
fn test_version_flag_exits_successfully() {
    let output = run_cli(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_invalid_endpoint_prints_error_and_exits() {
    let output = run_cli(&["--endpoint", "not-a-url"]);
    assert!(
        !output.status.success(),
        "Expected invalid endpoint to fail"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid endpoint"),
        "Should print error message about invalid endpoint: {}",
        stderr
    );
}

#[test]
fn test_unknown_flag_is_rejected() {
    let output = run_cli(&["--bogus"]);
    assert!(!output.status.success());
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use userlist::cli::{parse_endpoint_arg, Cli, StartupConfig};
    use userlist::data::USERS_ENDPOINT;

    #[test]
    fn test_cli_no_args_uses_defaults() {
        let cli = Cli::parse_from(["userlist"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.endpoint, USERS_ENDPOINT);
        assert!(config.cache_dir.is_none());
        assert!(!config.clear_cache);
    }

    #[test]
    fn test_cli_endpoint_override() {
        let cli = Cli::parse_from(["userlist", "--endpoint", "https://example.org/people"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.endpoint, "https://example.org/people");
    }

    #[test]
    fn test_parse_endpoint_arg_invalid_returns_error() {
        assert!(parse_endpoint_arg("example.org/people").is_err());
    }
}
