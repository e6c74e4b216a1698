//! CLI end-to-end: exit codes, artifacts, reports.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn frd() -> Command {
    let mut cmd = Command::cargo_bin("frd").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn read_json(path: PathBuf) -> Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}

#[test]
fn run_writes_canonical_artifacts() {
    let out = tempfile::tempdir().unwrap();
    frd()
        .arg("--input")
        .arg(fixture("comune_ok.json"))
        .arg("--normative")
        .arg(fixture("normativa.json"))
        .arg("--out")
        .arg(out.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("€ 88.450,00"));

    let result = read_json(out.path().join("result.json"));
    assert_eq!(result["total_fund"], 88450.0);
    assert_eq!(result["employee"]["stable"], 88450.0);

    let findings = read_json(out.path().join("findings.json"));
    let arr = findings.as_array().unwrap();
    assert_eq!(arr[0]["id"], "limite_art23_c2");
    assert_eq!(arr[0]["severity"], "info");

    let run = read_json(out.path().join("run_record.json"));
    assert!(run["id"].as_str().unwrap().starts_with("RUN:"));
    assert_eq!(run["entity_name"], "Comune di Valdoria");
    assert_eq!(run["inputs"]["input_sha256"].as_str().unwrap().len(), 64);

    assert!(!out.path().join("report.json").exists());
    assert!(!out.path().join("input.snapshot.json").exists());
}

#[test]
fn reruns_are_byte_identical() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    for dir in [&a, &b] {
        frd()
            .arg("--input")
            .arg(fixture("comune_ok.json"))
            .arg("--normative")
            .arg(fixture("normativa.json"))
            .arg("--out")
            .arg(dir.path())
            .arg("--quiet")
            .assert()
            .success();
    }
    for name in ["result.json", "findings.json", "run_record.json"] {
        assert_eq!(fs::read(a.path().join(name)).unwrap(), fs::read(b.path().join(name)).unwrap(), "{name}");
    }
}

#[test]
fn manifest_run_renders_both_reports() {
    let out = tempfile::tempdir().unwrap();
    frd()
        .arg("--manifest")
        .arg(fixture("manifest.json"))
        .arg("--out")
        .arg(out.path())
        .args(["--render", "json", "html", "--snapshot"])
        .assert()
        .success();

    let report = read_json(out.path().join("report.json"));
    assert_eq!(report["cover"]["entity"], "Comune di Valdoria");
    assert_eq!(report["cover"]["outcome"], "Conforme");
    assert_eq!(report["limit"]["adjusted_limit"], "€ 95.000,00");

    let html = fs::read_to_string(out.path().join("report.html")).unwrap();
    assert!(html.contains("<h1>Fondo risorse decentrate 2025</h1>"));
    assert!(html.contains("Limite rispettato"));

    let snapshot = read_json(out.path().join("input.snapshot.json"));
    assert_eq!(snapshot["annualData"]["denominazioneEnte"], "Comune di Valdoria");
}

#[test]
fn compliance_errors_fail_only_on_request() {
    let out = tempfile::tempdir().unwrap();
    let base = |cmd: &mut Command| {
        cmd.arg("--input")
            .arg(fixture("comune_over.json"))
            .arg("--normative")
            .arg(fixture("normativa.json"))
            .arg("--out")
            .arg(out.path());
    };

    let mut cmd = frd();
    base(&mut cmd);
    cmd.assert().success();

    let mut cmd = frd();
    base(&mut cmd);
    cmd.arg("--fail-on-error")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("1 error(s)"));

    let findings = read_json(out.path().join("findings.json"));
    assert_eq!(findings[0]["severity"], "error");
    assert_eq!(findings[0]["compliant"], false);
}

#[test]
fn invalid_input_exits_with_validation_code() {
    let out = tempfile::tempdir().unwrap();
    frd()
        .arg("--input")
        .arg(fixture("missing_name.json"))
        .arg("--normative")
        .arg(fixture("normativa.json"))
        .arg("--out")
        .arg(out.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("validation"));
    assert!(!out.path().join("result.json").exists());
}

#[test]
fn validate_only_prints_the_report() {
    frd()
        .arg("--input")
        .arg(fixture("missing_name.json"))
        .arg("--normative")
        .arg(fixture("normativa.json"))
        .arg("--validate-only")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Entity.NameMissing"))
        .stderr(predicate::str::contains("Entity.NameMissing @ /annualData/denominazioneEnte"));

    frd()
        .arg("--input")
        .arg(fixture("comune_ok.json"))
        .arg("--normative")
        .arg(fixture("normativa.json"))
        .arg("--validate-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pass\": true"));
}

#[test]
fn schema_violation_is_a_validation_error() {
    frd()
        .arg("--input")
        .arg(fixture("bad_shape.json"))
        .arg("--normative")
        .arg(fixture("normativa.json"))
        .arg("--validate-only")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("schema"));
}

#[test]
fn bad_flags_and_paths_are_rejected() {
    frd()
        .args(["--input", "https://example.org/input.json", "--normative", "n.json"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no scheme"));

    frd()
        .arg("--input")
        .arg(fixture("does_not_exist.json"))
        .arg("--normative")
        .arg(fixture("normativa.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("file not found"));
}
