//! MCP server workflows

use crate::common::{FileAssert, TestProject};
use aix::test_utils::fixtures::GITHUB_SERVER;
use serde_json::{Value, json};
use std::fs;

const GITHUB_ARGS: [&str; 9] = [
    "mcp",
    "add",
    "github",
    "--command=npx",
    "--arg=-y",
    "--arg=@modelcontextprotocol/server-github",
    "--scope",
    "project",
    "--platform",
];

fn add_github(project: &TestProject, platform: &str) -> crate::common::CommandOutput {
    let mut args = GITHUB_ARGS.to_vec();
    args.push(platform);
    project.run(&args)
}

#[test]
fn test_add_writes_claude_config() {
    let project = TestProject::new().unwrap();

    add_github(&project, "claude")
        .assert_success()
        .assert_stdout_contains("Added MCP server 'github' to 1 platform(s)");

    let content = fs::read_to_string(project.project_path().join(".claude/.mcp.json")).unwrap();
    assert_eq!(
        content,
        "{\n  \"mcpServers\": {\n    \"github\": {\n      \"command\": \"npx\",\n      \"args\": [\n        \"-y\",\n        \"@modelcontextprotocol/server-github\"\n      ]\n    }\n  }\n}\n"
    );
}

#[test]
fn test_add_preserves_unknown_opencode_fields() {
    let project = TestProject::new().unwrap();
    project
        .write(".opencode/opencode.json", "{\n  \"futureField\": \"x\"\n}\n")
        .unwrap();

    add_github(&project, "opencode").assert_success();

    let content = fs::read_to_string(project.project_path().join(".opencode/opencode.json")).unwrap();
    let value: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(value["futureField"], "x");
    assert_eq!(
        value["mcp"]["github"],
        json!({
            "command": ["npx", "-y", "@modelcontextprotocol/server-github"],
            "type": "local"
        })
    );
}

#[test]
fn test_add_conflict_writes_nothing() {
    let project = TestProject::new().unwrap();
    add_github(&project, "claude").assert_success();
    let path = project.project_path().join(".claude/.mcp.json");
    let before = fs::read_to_string(&path).unwrap();

    let output = project.run(&[
        "mcp",
        "add",
        "github",
        "--command=uvx",
        "--scope",
        "project",
    ]);
    output.assert_failure().assert_stderr_contains("already exists on Claude Code");

    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    FileAssert::not_exists(project.project_path().join(".opencode/opencode.json"));
}

#[test]
fn test_add_requires_command_or_url() {
    let project = TestProject::new().unwrap();

    project.run(&["mcp", "add", "github"]).assert_failure();
}

#[test]
fn test_disable_and_enable() {
    let project = TestProject::new().unwrap();
    add_github(&project, "claude").assert_success();
    let path = project.project_path().join(".claude/.mcp.json");

    project
        .run(&["mcp", "disable", "github", "--scope", "project"])
        .assert_success()
        .assert_stdout_contains("Disabled MCP server 'github' on 1 platform(s)");
    let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["mcpServers"]["github"]["disabled"], true);

    project.run(&["mcp", "enable", "github", "--scope", "project"]).assert_success();
    let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert!(value["mcpServers"]["github"].get("disabled").is_none());
}

#[test]
fn test_install_from_file_and_remove() {
    let project = TestProject::new().unwrap();
    project.write("servers/github.json", GITHUB_SERVER).unwrap();

    project
        .run(&["mcp", "install", "servers/github.json"])
        .assert_success()
        .assert_stdout_contains("installed to 2 platform(s)");

    let output = project.run(&["mcp", "list", "--json"]);
    output.assert_success();
    let entries: Vec<Value> = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["name"] == "github"));

    project
        .run(&["mcp", "remove", "github"])
        .assert_success()
        .assert_stdout_contains("Removed MCP server 'github' from 2 platform(s)");
    FileAssert::contains(project.home_path().join(".claude/.mcp.json"), "mcpServers");
}

#[test]
fn test_remove_unknown_server() {
    let project = TestProject::new().unwrap();

    project
        .run(&["mcp", "remove", "ghost"])
        .assert_failure()
        .assert_stderr_contains("not installed");
}

#[test]
fn test_validate_remote_server_file() {
    let project = TestProject::new().unwrap();
    project
        .write("remote.json", "{\"name\": \"docs\", \"url\": \"https://mcp.example.com/sse\"}\n")
        .unwrap();

    project
        .run(&["mcp", "validate", "remote.json"])
        .assert_success()
        .assert_stdout_contains("docs");
}
