use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::tempdir;

const COLLECTION_ID: &str = "https://skills.example.com/collections/pm";

fn skc() -> Command {
    Command::cargo_bin("skc").unwrap()
}

fn write_json(path: &Path, value: &Value) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

struct SkillFixture {
    meta: PathBuf,
    records: PathBuf,
    out: PathBuf,
}

fn skill_fixture(dir: &Path) -> SkillFixture {
    let meta = dir.join("collection.json");
    write_json(
        &meta,
        &json!({
            "id": COLLECTION_ID,
            "type": "RichSkillCollection",
            "name": "Project Management",
            "author": "Acme Skills Team",
        }),
    );
    let records = dir.join("skills");
    write_json(
        &records.join("grooming.json"),
        &json!({
            "id": "pm-001",
            "type": "RichSkillDescriptor",
            "skillName": "Backlog Grooming",
        }),
    );
    write_json(
        &records.join("risk.json"),
        &json!({
            "id": "pm-002",
            "type": "RichSkillDescriptor",
            "skillName": "Risk Management",
            "author": "Jane Author",
        }),
    );
    let out = dir.join("collection-compiled.json");
    SkillFixture { meta, records, out }
}

fn skills_args(fixture: &SkillFixture, mode: &str) -> Vec<String> {
    vec![
        "skills".to_string(),
        "--meta".to_string(),
        fixture.meta.display().to_string(),
        "--skills-dir".to_string(),
        fixture.records.display().to_string(),
        "--out".to_string(),
        fixture.out.display().to_string(),
        mode.to_string(),
    ]
}

#[test]
fn test_cli_help() {
    skc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_version() {
    skc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_subcommand_help_compiles_nothing() {
    let dir = tempdir().unwrap();
    skc()
        .current_dir(dir.path())
        .args(["skills", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--skills-dir"));
    assert!(!dir.path().join("collection-compiled.json").exists());
}

#[test]
fn test_write_then_check_succeeds() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());

    skc()
        .args(skills_args(&fixture, "--write"))
        .assert()
        .success()
        .stdout(predicate::str::contains(fixture.out.display().to_string()));
    assert!(fixture.out.exists());

    skc().args(skills_args(&fixture, "--check")).assert().success();
}

#[test]
fn test_check_without_artifact_reports_stale() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());

    skc()
        .args(skills_args(&fixture, "--check"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("out of date"));
}

#[test]
fn test_check_detects_mutated_source() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());

    skc().args(skills_args(&fixture, "--write")).assert().success();

    write_json(
        &fixture.records.join("risk.json"),
        &json!({
            "id": "pm-002",
            "type": "RichSkillDescriptor",
            "skillName": "Risk Management",
            "skillStatement": "Identify and mitigate delivery risks.",
            "author": "Jane Author",
        }),
    );

    skc()
        .args(skills_args(&fixture, "--check"))
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("out of date")
                .and(predicate::str::contains(fixture.out.display().to_string())),
        );
}

#[test]
fn test_fail_fast_leaves_existing_artifact_untouched() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());

    skc().args(skills_args(&fixture, "--write")).assert().success();
    let before = std::fs::read(&fixture.out).unwrap();

    // Missing the required identifier field.
    write_json(
        &fixture.records.join("broken.json"),
        &json!({"type": "RichSkillDescriptor", "skillName": "Anonymous"}),
    );

    skc()
        .args(skills_args(&fixture, "--write"))
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("missing required field")
                .and(predicate::str::contains("broken.json")),
        );

    let after = std::fs::read(&fixture.out).unwrap();
    assert_eq!(before, after);
}

#[test]
fn test_membership_mismatch_is_fatal() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());

    write_json(
        &fixture.records.join("pasted.json"),
        &json!({
            "id": "pm-099",
            "type": "RichSkillDescriptor",
            "skillName": "Pasted Skill",
            "isMemberOf": "https://skills.example.com/collections/other",
        }),
    );

    skc()
        .args(skills_args(&fixture, "--write"))
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("isMemberOf")
                .and(predicate::str::contains(COLLECTION_ID)),
        );
    assert!(!fixture.out.exists());
}

#[test]
fn test_empty_records_directory_is_rejected() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());
    std::fs::remove_dir_all(&fixture.records).unwrap();
    std::fs::create_dir_all(&fixture.records).unwrap();

    skc()
        .args(skills_args(&fixture, "--write"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no record files"));
    assert!(!fixture.out.exists());
}

#[test]
fn test_missing_records_directory_is_rejected() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());
    std::fs::remove_dir_all(&fixture.records).unwrap();

    skc()
        .args(skills_args(&fixture, "--write"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("records directory not found"));
}

#[test]
fn test_invalid_metadata_type_tag() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());
    write_json(
        &fixture.meta,
        &json!({"id": COLLECTION_ID, "type": "SkillCollection"}),
    );

    skc()
        .args(skills_args(&fixture, "--write"))
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("invalid collection metadata")
                .and(predicate::str::contains("RichSkillCollection")),
        );
}

#[test]
fn test_sort_ties_break_by_identifier() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());
    std::fs::remove_dir_all(&fixture.records).unwrap();
    // Written in descending id order; the artifact must not care.
    write_json(
        &fixture.records.join("a.json"),
        &json!({"id": "pm-010", "type": "RichSkillDescriptor", "skillName": "Risk"}),
    );
    write_json(
        &fixture.records.join("b.json"),
        &json!({"id": "pm-002", "type": "RichSkillDescriptor", "skillName": "Risk"}),
    );

    skc().args(skills_args(&fixture, "--write")).assert().success();

    let text = std::fs::read_to_string(&fixture.out).unwrap();
    let first = text.find("pm-002").unwrap();
    let second = text.find("pm-010").unwrap();
    assert!(first < second);
}

#[test]
fn test_collection_author_is_inherited() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());

    skc().args(skills_args(&fixture, "--write")).assert().success();

    let artifact: Value =
        serde_json::from_str(&std::fs::read_to_string(&fixture.out).unwrap()).unwrap();
    let skills = artifact["skills"].as_array().unwrap();
    assert_eq!(skills.len(), 2);
    // pm-001 sorts first (Backlog Grooming) and had no author of its own.
    assert_eq!(skills[0]["id"], json!("pm-001"));
    assert_eq!(skills[0]["author"], json!("Acme Skills Team"));
    assert_eq!(skills[0]["isMemberOf"], json!(COLLECTION_ID));
    // pm-002 keeps its explicit author.
    assert_eq!(skills[1]["author"], json!("Jane Author"));
}

#[test]
fn test_write_and_check_are_mutually_exclusive() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());

    let mut args = skills_args(&fixture, "--write");
    args.push("--check".to_string());
    skc().args(&args).assert().failure();

    // Neither flag is an error too.
    let args: Vec<_> = skills_args(&fixture, "--write")
        .into_iter()
        .filter(|a| a != "--write")
        .collect();
    skc().args(&args).assert().failure();
}

#[test]
fn test_unknown_sort_key_is_rejected() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());

    let mut args = skills_args(&fixture, "--write");
    args.extend(["--sort-by".to_string(), "category".to_string()]);
    skc()
        .args(&args)
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("invalid argument")
                .and(predicate::str::contains("skillName")),
        );
}

#[test]
fn test_sort_by_id() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());

    let mut args = skills_args(&fixture, "--write");
    args.extend(["--sort-by".to_string(), "id".to_string()]);
    skc().args(&args).assert().success();

    let artifact: Value =
        serde_json::from_str(&std::fs::read_to_string(&fixture.out).unwrap()).unwrap();
    let ids: Vec<_> = artifact["skills"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["pm-001", "pm-002"]);
}

#[test]
fn test_robot_mode_reports_compile_summary() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());

    let mut cmd = skc();
    cmd.arg("--robot").args(skills_args(&fixture, "--write"));
    let output = cmd.output().unwrap();
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["variant"], json!("skills"));
    assert_eq!(report["action"], json!("write"));
    assert_eq!(report["records"], json!(2));
    assert_eq!(report["status"], json!("written"));
    assert_eq!(report["digest"].as_str().unwrap().len(), 64);
}

#[test]
fn test_robot_mode_error_output() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());
    std::fs::remove_dir_all(&fixture.records).unwrap();

    let mut cmd = skc();
    cmd.arg("--robot").args(skills_args(&fixture, "--write"));
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("\"error\":true"))
        .stdout(predicate::str::contains("missing_directory"));
}

#[test]
fn test_config_file_supplies_defaults() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());
    let config_path = dir.path().join("skc.toml");
    std::fs::write(
        &config_path,
        format!(
            "[skills]\nmeta = {:?}\ndir = {:?}\nout = {:?}\n",
            fixture.meta.display().to_string(),
            fixture.records.display().to_string(),
            fixture.out.display().to_string(),
        ),
    )
    .unwrap();

    skc()
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "skills",
            "--write",
        ])
        .assert()
        .success();
    assert!(fixture.out.exists());
}

#[test]
fn test_competencies_write_and_check() {
    let dir = tempdir().unwrap();
    let meta = dir.path().join("collection-meta.json");
    write_json(
        &meta,
        &json!({
            "@id": "https://credentials.example.com/collections/data",
            "@type": "ceterms:Collection",
            "name": "Data Literacy",
        }),
    );
    let records = dir.path().join("competencies");
    write_json(
        &records.join("viz.json"),
        &json!({
            "@id": "https://credentials.example.com/competencies/viz",
            "@type": "ceterms:Competency",
            "name": "Visualize Data",
        }),
    );
    write_json(
        &records.join("clean.json"),
        &json!({
            "@id": "https://credentials.example.com/competencies/clean",
            "@type": "ceterms:Competency",
            "name": "Clean Data",
        }),
    );
    let out = dir.path().join("competencies-compiled.json");

    let args = |mode: &str| {
        vec![
            "competencies".to_string(),
            "--meta".to_string(),
            meta.display().to_string(),
            "--competencies-dir".to_string(),
            records.display().to_string(),
            "--out".to_string(),
            out.display().to_string(),
            mode.to_string(),
        ]
    };

    skc().args(args("--write")).assert().success();
    skc().args(args("--check")).assert().success();

    let artifact: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let names: Vec<_> = artifact["competencies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Clean Data", "Visualize Data"]);

    // The lenient `type` spelling is a skills-only convention.
    write_json(
        &records.join("loose.json"),
        &json!({
            "@id": "https://credentials.example.com/competencies/loose",
            "type": "ceterms:Competency",
            "name": "Loose Tag",
        }),
    );
    skc()
        .args(args("--write"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("@type"));
}

#[test]
fn test_malformed_json_record_names_the_file() {
    let dir = tempdir().unwrap();
    let fixture = skill_fixture(dir.path());
    std::fs::write(fixture.records.join("broken.json"), "{not json").unwrap();

    skc()
        .args(skills_args(&fixture, "--write"))
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("malformed record")
                .and(predicate::str::contains("broken.json")),
        );
}
