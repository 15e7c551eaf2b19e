//! Tests for command dispatch

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use clap::Parser;
use tempfile::TempDir;

use flavorwheel::application::render::TreeNodeConvert;
use flavorwheel::cli::args::Cli;
use flavorwheel::cli::commands::execute_command;
use flavorwheel::cli::CliError;
use flavorwheel::config::Settings;
use flavorwheel::domain::TreeNode;
use flavorwheel::exitcode;
use flavorwheel::infrastructure::di::ServiceContainer;

/// Point the global config layer at an empty directory for this binary.
fn isolate_config_home() {
    static HOME: OnceLock<TempDir> = OnceLock::new();
    HOME.get_or_init(|| {
        let dir = TempDir::new().expect("create config home");
        std::env::set_var("XDG_CONFIG_HOME", dir.path());
        dir
    });
}

fn parse(args: &[&str]) -> Cli {
    isolate_config_home();
    let mut argv = vec!["flavorwheel"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("valid arguments")
}

#[test]
fn given_build_with_output_when_executing_then_writes_sorted_json() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("wheel.json");
    let cli = parse(&[
        "build",
        "tests/resources/flavors.csv",
        "--sorted",
        "--compact",
        "-o",
        out.to_str().unwrap(),
    ]);

    // Act
    execute_command(&cli).unwrap();

    // Assert
    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written.lines().count(), 1);
    let tree: TreeNode = serde_json::from_str(&written).unwrap();
    let berry = tree.child("Fruity").and_then(|n| n.child("Berry")).unwrap();
    let leaves: Vec<&str> = berry.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(leaves, vec!["Blackberry", "Blueberry", "Raspberry", "Strawberry"]);
}

#[test]
fn given_csv_missing_column_when_executing_then_exits_with_dataerr() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let csv = temp.path().join("bad.csv");
    fs::write(&csv, "Basic,Final\nFruity,Blackberry\n").unwrap();
    let cli = parse(&["summary", csv.to_str().unwrap()]);

    // Act
    let err = execute_command(&cli).unwrap_err();

    // Assert
    assert_eq!(err.exit_code(), exitcode::DATAERR);
    assert!(err.to_string().contains("Middle"), "message: {err}");
}

#[test]
fn given_missing_input_file_when_executing_then_exits_with_noinput() {
    // Arrange
    let cli = parse(&["tree", "tests/resources/does-not-exist.csv"]);

    // Act
    let err = execute_command(&cli).unwrap_err();

    // Assert
    assert_eq!(err.exit_code(), exitcode::NOINPUT);
}

#[test]
fn given_missing_config_file_when_executing_then_exits_with_config() {
    // Arrange
    let cli = parse(&[
        "--config",
        "tests/resources/absent.toml",
        "build",
        "tests/resources/flavors.csv",
    ]);

    // Act
    let err = execute_command(&cli).unwrap_err();

    // Assert
    assert_eq!(err.exit_code(), exitcode::CONFIG);
}

#[test]
fn given_no_subcommand_when_executing_then_reports_usage() {
    // Act
    let err = execute_command(&parse(&[])).unwrap_err();

    // Assert
    assert!(matches!(err, CliError::Usage(_)));
    assert_eq!(err.exit_code(), exitcode::USAGE);
}

#[test]
fn given_fixture_when_running_tree_and_summary_then_both_succeed() {
    // Arrange
    let tree = parse(&["tree", "tests/resources/flavors.csv", "--sorted"]);
    let summary = parse(&["summary", "tests/resources/flavors.csv"]);

    // Act
    let tree_result = execute_command(&tree);
    let summary_result = execute_command(&summary);

    // Assert
    assert!(tree_result.is_ok(), "tree: {tree_result:?}");
    assert!(summary_result.is_ok(), "summary: {summary_result:?}");
}

#[test]
fn given_header_only_csv_when_running_summary_then_succeeds() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let csv = temp.path().join("empty.csv");
    fs::write(&csv, "Basic,Middle,Final\n").unwrap();

    // Act
    let result = execute_command(&parse(&["summary", csv.to_str().unwrap()]));

    // Assert
    assert!(result.is_ok(), "summary: {result:?}");
}

#[test]
fn given_fixture_when_rendering_ascii_tree_then_shows_every_level() {
    // Arrange
    isolate_config_home();
    let container = ServiceContainer::new(Settings::default()).unwrap();
    let out = container
        .wheel
        .load(Path::new("tests/resources/flavors.csv"))
        .unwrap();

    // Act
    let rendered = out.tree.to_tree_string().to_string();

    // Assert
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "flavors");
    assert_eq!(lines.len(), 1 + 9 + 26 + 37);
    assert!(lines.iter().any(|l| l.ends_with("Rubber, Skunky")));
}

#[test]
fn given_invalid_utf8_file_when_executing_then_exits_with_dataerr() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let csv = temp.path().join("bad.csv");
    fs::write(&csv, b"Basic,Middle,Final\nFruity,Berry,\xff\xfe\n").unwrap();

    // Act
    let err = execute_command(&parse(&["build", csv.to_str().unwrap()])).unwrap_err();

    // Assert
    assert_eq!(err.exit_code(), exitcode::DATAERR);
}
