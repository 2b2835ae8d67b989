//! Agent workflows

use crate::common::{FileAssert, TestProject};
use aix::test_utils::fixtures::REVIEWER_AGENT;

#[test]
fn test_install_agent_on_both_platforms() {
    let project = TestProject::new().unwrap();
    project.write("reviewer.md", REVIEWER_AGENT).unwrap();

    project
        .run(&["agent", "install", "reviewer.md"])
        .assert_success()
        .assert_stdout_contains("Agent 'reviewer' installed to 2 platform(s)");

    let home = project.home_path();
    FileAssert::contains(home.join(".config/opencode/agent/reviewer.md"), "mode: subagent");
    FileAssert::contains(home.join(".claude/agents/reviewer.md"), "You review code.");
}

#[test]
fn test_validate_agent() {
    let project = TestProject::new().unwrap();
    project.write("reviewer.md", REVIEWER_AGENT).unwrap();

    project
        .run(&["agent", "validate", "reviewer.md"])
        .assert_success()
        .assert_stdout_contains("Agent 'reviewer' is valid");
}

#[test]
fn test_list_agents_text() {
    let project = TestProject::new().unwrap();
    project.write("reviewer.md", REVIEWER_AGENT).unwrap();
    project.run(&["agent", "install", "reviewer.md", "--platform", "claude"]).assert_success();

    project
        .run(&["agent", "list"])
        .assert_success()
        .assert_stdout_contains("reviewer");
}
