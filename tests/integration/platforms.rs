//! Platform detection

use crate::common::TestProject;
use predicates::prelude::*;
use serde_json::Value;

#[test]
fn test_platforms_json_reports_detection() {
    let project = TestProject::claude_only().unwrap();

    let output = project.run(&["platforms", "--json"]);
    output.assert_success();
    let platforms: Vec<Value> = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(platforms.len(), 2);

    let claude = platforms.iter().find(|p| p["id"] == "claude").unwrap();
    assert_eq!(claude["available"], true);
    assert_eq!(claude["name"], "Claude Code");
    let instructions = claude["instructions"].as_str().unwrap();
    assert!(instructions.ends_with("CLAUDE.md"), "{instructions}");
    let opencode = platforms.iter().find(|p| p["id"] == "opencode").unwrap();
    assert_eq!(opencode["available"], false);
}

#[test]
fn test_platforms_text_output() {
    let project = TestProject::new().unwrap();

    project
        .run(&["platforms"])
        .assert_success()
        .assert_stdout_contains("Claude Code (claude) installed")
        .assert_stdout_contains("OpenCode (opencode) installed");
}

#[test]
fn test_unknown_platform_suggests_closest() {
    let project = TestProject::new().unwrap();

    project
        .run(&["platforms", "--platform", "claud"])
        .assert_failure()
        .assert_stderr_contains("claude");
}

#[test]
fn test_help_lists_subcommands() {
    let project = TestProject::new().unwrap();

    project
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("command"))
        .stdout(predicate::str::contains("mcp"))
        .stdout(predicate::str::contains("platforms"));
}

#[test]
fn test_unknown_scope_is_usage_error() {
    let project = TestProject::new().unwrap();

    project
        .cmd()
        .args(["command", "list", "--scope", "galaxy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("galaxy"));
}
