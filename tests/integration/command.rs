//! Slash command workflows

use crate::common::{FileAssert, TestProject};
use aix::test_utils::fixtures::{INVALID_NAME_COMMAND, REVIEW_COMMAND, RICH_COMMAND};

#[test]
fn test_validate_valid_command() {
    let project = TestProject::new().unwrap();
    project.write("review.md", REVIEW_COMMAND).unwrap();

    project
        .run(&["command", "validate", "review.md"])
        .assert_success()
        .assert_stdout_contains("✓ Command '/review' is valid");
}

#[test]
fn test_validate_reports_bad_name() {
    let project = TestProject::new().unwrap();
    project.write("bad.md", INVALID_NAME_COMMAND).unwrap();

    let output = project.run(&["command", "validate", "bad.md"]);
    output.assert_failure();
    let combined = format!("{}{}", output.stdout, output.stderr);
    assert!(combined.contains("must be lowercase"), "{combined}");
    assert!(combined.contains("INVALID-NAME"), "{combined}");
}

#[test]
fn test_validate_json_output() {
    let project = TestProject::new().unwrap();
    project.write("review.md", REVIEW_COMMAND).unwrap();

    let output = project.run(&["command", "validate", "review.md", "--json"]);
    output.assert_success();
    let json: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(json["name"], "review");
    assert_eq!(json["valid"], true);
}

#[test]
fn test_install_directory_to_all_platforms() {
    let project = TestProject::new().unwrap();
    project.write("my-cmd/command.md", REVIEW_COMMAND).unwrap();

    project
        .run(&["command", "install", "./my-cmd/"])
        .assert_success()
        .assert_stdout_contains("✓ Command 'review' installed to 2 platform(s)");

    let home = project.home_path();
    FileAssert::contains(home.join(".claude/commands/review.md"), "Review the code.");
    FileAssert::contains(home.join(".config/opencode/commands/review.md"), "Review the code.");
}

#[test]
fn test_install_infers_name_from_file() {
    let project = TestProject::claude_only().unwrap();
    project.write("fix-issue.md", RICH_COMMAND).unwrap();

    project
        .run(&["command", "install", "fix-issue.md"])
        .assert_success()
        .assert_stdout_contains("Command 'fix-issue' installed to 1 platform(s)");
    FileAssert::contains(project.home_path().join(".claude/commands/fix-issue.md"), "allowed-tools");
}

#[test]
fn test_install_drops_unsupported_fields_with_warning() {
    let project = TestProject::new().unwrap();
    project.write("fix-issue.md", RICH_COMMAND).unwrap();

    let output = project.run(&["command", "install", "fix-issue.md", "--platform", "opencode"]);
    output
        .assert_success()
        .assert_stderr_contains("OpenCode does not support");

    let installed = std::fs::read_to_string(project.home_path().join(".config/opencode/commands/fix-issue.md")).unwrap();
    assert!(!installed.contains("allowed-tools"));
    assert!(installed.contains("Fix issue $ARGUMENTS."));
}

#[test]
fn test_install_conflict_requires_force() {
    let project = TestProject::new().unwrap();
    project.write("review.md", REVIEW_COMMAND).unwrap();
    project.run(&["command", "install", "review.md"]).assert_success();

    project
        .run(&["command", "install", "review.md"])
        .assert_failure()
        .assert_stderr_contains("already exists on");

    project
        .run(&["command", "install", "review.md", "--force"])
        .assert_success();
}

#[test]
fn test_install_with_no_platform_detected() {
    let project = TestProject::bare().unwrap();
    project.write("review.md", REVIEW_COMMAND).unwrap();

    project
        .run(&["command", "install", "review.md"])
        .assert_failure()
        .assert_stderr_contains("No supported AI platforms");
}

#[test]
fn test_list_and_remove() {
    let project = TestProject::new().unwrap();
    project.write("review.md", REVIEW_COMMAND).unwrap();
    project.run(&["command", "install", "review.md"]).assert_success();

    let output = project.run(&["command", "list", "--json"]);
    output.assert_success();
    let entries: Vec<serde_json::Value> = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e["name"] == "review"));

    project
        .run(&["command", "remove", "review"])
        .assert_success()
        .assert_stdout_contains("from 2 platform(s)");
    FileAssert::not_exists(project.home_path().join(".claude/commands/review.md"));
    FileAssert::not_exists(project.home_path().join(".config/opencode/commands/review.md"));
}

#[test]
fn test_remove_missing_command() {
    let project = TestProject::new().unwrap();

    project
        .run(&["command", "remove", "ghost"])
        .assert_failure()
        .assert_stderr_contains("ghost");
}

#[test]
fn test_project_scope_install() {
    let project = TestProject::new().unwrap();
    project.write("review.md", REVIEW_COMMAND).unwrap();

    project
        .run(&["command", "install", "review.md", "--scope", "project", "--platform", "claude"])
        .assert_success();
    FileAssert::exists(project.project_path().join(".claude/commands/review.md"));
    FileAssert::not_exists(project.home_path().join(".claude/commands/review.md"));
}

#[test]
fn test_init_scaffold_then_validate() {
    let project = TestProject::new().unwrap();

    project
        .run(&["command", "init", "deploy", "--description", "Deploy the app"])
        .assert_success()
        .assert_stdout_contains("Created command '/deploy'");
    FileAssert::contains(project.project_path().join("deploy.md"), "Deploy the app");

    project.run(&["command", "validate", "deploy.md"]).assert_success();
}

#[test]
fn test_init_into_new_directory_and_overwrite() {
    let project = TestProject::new().unwrap();
    let drafts = project.project_path().join("drafts/team");

    project
        .run(&["command", "init", "deploy", "--dir", "drafts/team", "--description", "First"])
        .assert_success();
    FileAssert::contains(drafts.join("deploy.md"), "First");

    project
        .run(&["command", "init", "deploy", "--dir", "drafts/team", "--description", "Second"])
        .assert_failure()
        .assert_stderr_contains("already exists");
    FileAssert::contains(drafts.join("deploy.md"), "First");

    project
        .run(&["command", "init", "deploy", "--dir", "drafts/team", "--description", "Second", "--force"])
        .assert_success();
    FileAssert::contains(drafts.join("deploy.md"), "Second");

    // Only the scaffold itself is left behind
    let entries: Vec<_> = std::fs::read_dir(&drafts)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(entries, vec!["deploy.md"]);
}
