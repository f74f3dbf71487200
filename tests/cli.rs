use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::{TempDir, tempdir};

const CATALOG: &str = r"
skills:
  - id: s1
    name: Foot lock
    apparatus: silks
    level: beginner
    weeks: [1, 2, 3]
  - id: s2
    name: Hip key
    apparatus: silks
    level: beginner
    parent: s1
    weeks: [3, 4]
";

fn cst(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cst").unwrap();
    cmd.env("CST_ROOT", root)
        .env("XDG_CONFIG_HOME", root.join("xdg"))
        .env_remove("CST_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// Run a robot-mode command and return `data` from the ok response.
fn robot_ok(root: &Path, args: &[&str]) -> Value {
    let output = cst(root).arg("-m").args(args).output().unwrap();
    assert!(
        output.status.success(),
        "cst {args:?} failed\nstdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "ok");
    json["data"].clone()
}

fn seeded_root() -> TempDir {
    let dir = tempdir().unwrap();
    robot_ok(dir.path(), &["init"]);
    let catalog = dir.path().join("catalog.yaml");
    std::fs::write(&catalog, CATALOG).unwrap();
    robot_ok(dir.path(), &["import", catalog.to_str().unwrap()]);
    dir
}

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("cst").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("cst").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_init_writes_config_and_database() {
    let dir = tempdir().unwrap();
    let data = robot_ok(dir.path(), &["init"]);
    assert_eq!(data["config_written"], Value::Bool(true));
    assert!(dir.path().join("config.toml").exists());
    assert!(dir.path().join("cst.db").exists());

    let again = robot_ok(dir.path(), &["init"]);
    assert_eq!(again["config_written"], Value::Bool(false));
}

#[test]
fn test_suggest_by_week_and_date() {
    let dir = seeded_root();

    let week3 = robot_ok(dir.path(), &["suggest", "--week", "3"]);
    assert_eq!(ids(&week3["skills"]), vec!["s1", "s2"]);

    let week1 = robot_ok(dir.path(), &["suggest", "--week", "1"]);
    assert_eq!(ids(&week1["skills"]), vec!["s1"]);

    let by_date = robot_ok(dir.path(), &["suggest", "--date", "2024-01-15"]);
    assert_eq!(by_date["week_of_year"], 3);
    assert_eq!(by_date["count"], 2);
}

#[test]
fn test_suggest_rejects_out_of_range_week() {
    let dir = seeded_root();
    let output = cst(dir.path())
        .args(["-m", "suggest", "--week", "54"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"]["error"]["code"], "VALIDATION_FAILED");
}

#[test]
fn test_skill_weeks_and_tree() {
    let dir = seeded_root();
    let updated = robot_ok(dir.path(), &["skill", "weeks", "s2", "10,11"]);
    assert_eq!(updated["skill"]["applicable_weeks"], serde_json::json!([10, 11]));

    let tree = robot_ok(dir.path(), &["skill", "tree", "s1"]);
    assert_eq!(tree["tree"][0]["id"], "s1");
    assert_eq!(tree["tree"][0]["children"][0]["id"], "s2");

    cst(dir.path())
        .args(["skill", "show", "s1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Foot lock"));
}

#[test]
fn test_plan_progress_workflow() {
    let dir = seeded_root();
    let root = dir.path();

    let instructor = robot_ok(root, &["instructor", "create", "Kim", "--teaches", "silks:advanced"]);
    let instructor_id = instructor["instructor"]["id"].as_str().unwrap().to_string();
    let student = robot_ok(root, &["student", "create", "Ada", "--external-id", "00042"]);
    let student_id = student["student"]["id"].as_str().unwrap().to_string();

    let class = robot_ok(
        root,
        &[
            "class",
            "create",
            "Monday silks",
            "--type",
            "adult",
            "--apparatus",
            "silks",
            "--level",
            "beginner",
            "--start",
            "2024-08-05T18:00",
            "--end",
            "2024-08-05T19:00",
            "--instructor",
            &instructor_id,
            "--students",
            &student_id,
        ],
    );
    let class_id = class["class"]["id"].as_str().unwrap().to_string();

    // One bad skill id: nothing is written.
    let output = cst(root)
        .args([
            "-m", "plan", "create", "--class", &class_id, "--title", "T", "--date", "2024-08-05",
            "--duration", "60", "--skills", "s1,s2,doesNotExist",
        ])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"]["error"]["code"], "REFERENCES_MISSING");
    assert_eq!(
        json["status"]["error"]["context"]["missing"],
        serde_json::json!(["doesNotExist"])
    );
    assert_eq!(robot_ok(root, &["plan", "list"])["count"], 0);

    let created = robot_ok(
        root,
        &[
            "plan", "create", "--class", &class_id, "--title", "T", "--date", "2024-08-05",
            "--skills", "s2,s1",
        ],
    );
    let plan = &created["plan"];
    assert_eq!(plan["week_of_year"], 32);
    assert_eq!(plan["duration_minutes"], 60);
    assert_eq!(plan["skills"][0]["skill"]["id"], "s2");
    assert_eq!(plan["class"]["students"][0]["name"], "Ada");
    let plan_id = plan["id"].as_str().unwrap().to_string();

    let updated = robot_ok(root, &["plan", "update", &plan_id, "--skills", "s1"]);
    assert_eq!(updated["plan"]["skills"].as_array().unwrap().len(), 1);
    assert_eq!(updated["plan"]["skills"][0]["position"], 1);

    let usage = robot_ok(root, &["plan", "using-skill", "s1"]);
    assert_eq!(usage["count"], 1);
    assert_eq!(usage["plans"][0]["id"], plan_id.as_str());
    assert_eq!(usage["plans"][0]["class"]["name"], "Monday silks");
    assert_eq!(usage["plans"][0]["instructor"]["name"], "Kim");
    assert_eq!(usage["plans"][0]["positions"], serde_json::json!([1]));

    robot_ok(root, &["progress", "set", &student_id, "s1", "mastered", "--by", "Kim"]);
    robot_ok(root, &["progress", "set", &student_id, "s1", "competent"]);
    let progress = robot_ok(root, &["progress", "show", &student_id]);
    let rows = progress["progress"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    let s1 = rows.iter().find(|r| r["skill"]["id"] == "s1").unwrap();
    assert_eq!(s1["status"], "COMPETENT");
    assert_eq!(s1["assessed_by"], Value::Null);
    let s2 = rows.iter().find(|r| r["skill"]["id"] == "s2").unwrap();
    assert_eq!(s2["status"], "NOT_ATTEMPTED");

    let found = robot_ok(root, &["student", "show", "--external-id", "00042"]);
    assert_eq!(found["student"]["id"], student_id.as_str());

    robot_ok(root, &["plan", "delete", &plan_id]);
    let output = cst(root).args(["-m", "plan", "show", &plan_id]).output().unwrap();
    assert!(!output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"]["error"]["code"], "CLASS_PLAN_NOT_FOUND");
}

#[test]
fn test_human_error_goes_to_stderr() {
    let dir = seeded_root();
    cst(dir.path())
        .args(["plan", "show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Class plan not found: nope"));
}

#[test]
fn test_config_key_lookup() {
    let dir = tempdir().unwrap();
    let data = robot_ok(dir.path(), &["config", "catalog.default_weeks"]);
    assert_eq!(data["value"], serde_json::json!([1, 2, 3, 4, 5, 6, 7, 8]));
}
