//! Repository workflows: add, search, install by name

use crate::common::{FileAssert, TestProject};
use aix::test_utils::TestGit;
use aix::test_utils::fixtures::{GITHUB_SERVER, PDF_SKILL, REVIEW_COMMAND, RepoFixture};
use serde_json::Value;

/// Create and commit a repository named `name` inside the test tree.
fn fixture_repo(project: &TestProject, name: &str) -> TestGit {
    let git = TestGit::new(project.home_path().parent().unwrap().join("remotes").join(name));
    git.init().unwrap();
    RepoFixture::new()
        .command("review", REVIEW_COMMAND)
        .skill("pdf", PDF_SKILL, &[("scripts/extract.py", "print('pdf')\n")])
        .mcp("github", GITHUB_SERVER)
        .write_to(git.repo_path())
        .unwrap();
    git.commit_all("Initial artifacts").unwrap();
    git
}

#[test]
fn test_add_local_path_and_install_by_name() {
    let project = TestProject::new().unwrap();
    let repo_dir = project.project_path().join("shared");
    RepoFixture::new()
        .command("review", REVIEW_COMMAND)
        .write_to(&repo_dir)
        .unwrap();

    project
        .run(&["repo", "add", "unused", "--name", "shared", "--path", repo_dir.to_str().unwrap()])
        .assert_success()
        .assert_stdout_contains("Added repository 'shared' (1 artifact(s))");
    FileAssert::contains(project.config_path(), "shared");

    project
        .run(&["command", "install", "review"])
        .assert_success()
        .assert_stdout_contains("Command 'review' installed to 2 platform(s)");
    FileAssert::exists(project.home_path().join(".claude/commands/review.md"));
}

#[test]
fn test_add_git_repository_and_search() {
    if !TestGit::available() {
        eprintln!("git not available, skipping");
        return;
    }
    let project = TestProject::new().unwrap();
    let git = fixture_repo(&project, "team-artifacts");

    project
        .run(&["repo", "add", &git.file_url()])
        .assert_success()
        .assert_stdout_contains("Added repository 'team-artifacts' (3 artifact(s))");
    FileAssert::exists(project.aix_dir().join("repos/team-artifacts/commands/review.md"));

    let output = project.run(&["skill", "search", "pdf", "--json"]);
    output.assert_success();
    let results: Vec<Value> = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "pdf");

    project.run(&["skill", "install", "pdf"]).assert_success();
    FileAssert::exists(project.home_path().join(".claude/skills/pdf/scripts/extract.py"));

    project
        .run(&["mcp", "install", "github", "--platform", "claude"])
        .assert_success();
    FileAssert::contains(project.home_path().join(".claude/.mcp.json"), "server-github");
}

#[test]
fn test_install_all_from_repo() {
    let project = TestProject::claude_only().unwrap();
    let repo_dir = project.project_path().join("shared");
    RepoFixture::new()
        .command("review", REVIEW_COMMAND)
        .command("deploy", &REVIEW_COMMAND.replace("name: review", "name: deploy"))
        .write_to(&repo_dir)
        .unwrap();
    project
        .run(&["repo", "add", "unused", "--name", "shared", "--path", repo_dir.to_str().unwrap()])
        .assert_success();

    project
        .run(&["command", "install", "--all-from-repo", "shared"])
        .assert_success()
        .assert_stdout_contains("Command 'deploy' installed")
        .assert_stdout_contains("Command 'review' installed");
}

#[test]
fn test_duplicate_repository_is_rejected() {
    let project = TestProject::new().unwrap();
    let repo_dir = project.project_path().join("shared");
    std::fs::create_dir_all(&repo_dir).unwrap();
    let path = repo_dir.to_str().unwrap();

    project
        .run(&["repo", "add", "unused", "--name", "shared", "--path", path])
        .assert_success();
    project
        .run(&["repo", "add", "unused", "--name", "shared", "--path", path])
        .assert_failure()
        .assert_stderr_contains("already exists");
}

#[test]
fn test_list_and_remove_repository() {
    let project = TestProject::new().unwrap();
    let repo_dir = project.project_path().join("shared");
    RepoFixture::new().command("review", REVIEW_COMMAND).write_to(&repo_dir).unwrap();
    project
        .run(&["repo", "add", "unused", "--name", "shared", "--path", repo_dir.to_str().unwrap()])
        .assert_success();

    project.run(&["repo", "list"]).assert_success().assert_stdout_contains("shared");

    project
        .run(&["repo", "remove", "shared"])
        .assert_success()
        .assert_stdout_contains("Removed repository 'shared'");
    // Unmanaged checkouts stay on disk.
    FileAssert::exists(repo_dir.join("commands/review.md"));

    project
        .run(&["repo", "list"])
        .assert_success()
        .assert_stdout_contains("No repositories configured");
}

#[test]
fn test_search_without_repositories() {
    let project = TestProject::new().unwrap();

    project
        .run(&["command", "search", "review"])
        .assert_success()
        .assert_stderr_contains("No repositories configured");
}
