//! Skill workflows

use crate::common::{FileAssert, TestProject};
use aix::test_utils::fixtures::PDF_SKILL;

#[test]
fn test_install_skill_copies_supporting_files() {
    let project = TestProject::new().unwrap();
    project.write("pdf/SKILL.md", PDF_SKILL).unwrap();
    project.write("pdf/scripts/extract.py", "print('pdf')\n").unwrap();

    project
        .run(&["skill", "install", "./pdf"])
        .assert_success()
        .assert_stdout_contains("Skill 'pdf' installed to 2 platform(s)");

    let home = project.home_path();
    FileAssert::contains(home.join(".claude/skills/pdf/SKILL.md"), "Extract text");
    FileAssert::contains(home.join(".claude/skills/pdf/scripts/extract.py"), "print('pdf')");
    FileAssert::exists(home.join(".config/opencode/skill/pdf/SKILL.md"));
    FileAssert::exists(home.join(".config/opencode/skill/pdf/scripts/extract.py"));
}

#[test]
fn test_skill_without_description_is_invalid() {
    let project = TestProject::new().unwrap();
    project.write("pdf/SKILL.md", "---\nname: pdf\n---\n\n# PDF\n").unwrap();

    project
        .run(&["skill", "validate", "pdf"])
        .assert_failure()
        .assert_stderr_contains("description is required");
}

#[test]
fn test_show_skill_json() {
    let project = TestProject::claude_only().unwrap();
    project.write("pdf/SKILL.md", PDF_SKILL).unwrap();
    project.run(&["skill", "install", "pdf"]).assert_success();

    let output = project.run(&["skill", "show", "pdf", "--json"]);
    output.assert_success();
    let json: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(json["name"], "pdf");
    assert_eq!(json["platforms"][0], "claude");
}

#[test]
fn test_remove_skill_deletes_directory() {
    let project = TestProject::claude_only().unwrap();
    project.write("pdf/SKILL.md", PDF_SKILL).unwrap();
    project.run(&["skill", "install", "pdf"]).assert_success();

    project.run(&["skill", "remove", "pdf"]).assert_success();
    FileAssert::not_exists(project.home_path().join(".claude/skills/pdf"));
}

#[test]
fn test_init_skill_layout() {
    let project = TestProject::new().unwrap();

    project.run(&["skill", "init", "csv-tools"]).assert_success();
    FileAssert::contains(project.project_path().join("csv-tools/SKILL.md"), "name: csv-tools");
    project.run(&["skill", "validate", "csv-tools"]).assert_success();
}
