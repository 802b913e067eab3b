use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../winspector.toml")
}

fn winspector() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_winspector"));
    cmd.arg("--config").arg(config());
    cmd
}

fn json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.arg("--json").output().expect("command should run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn validate_reports_shipped_data() {
    winspector()
        .args(["validate", "--strict"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Knowledge base OK"))
        .stdout(predicate::str::contains("heuristic rules: 7"));
}

#[test]
fn classify_ignores_case() {
    winspector()
        .args(["classify", "service", "diagtrack"])
        .assert()
        .success()
        .stdout(predicate::str::contains("recommended-removal"));

    let answer = json(winspector().args(["classify", "services", "WINDEFEND"]));
    assert_eq!(answer["classification"], "critical");
    assert_eq!(answer["kind"], "service");
}

#[test]
fn classify_rejects_unknown_kind() {
    winspector()
        .args(["classify", "driver", "foo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown component kind"));
}

#[test]
fn domain_lookup_uses_most_specific_entry() {
    let annotated = json(winspector().args(["domain", "eu.vortex.data.microsoft.com"]));
    assert_eq!(annotated["verdict"], "annotated");
    assert_eq!(annotated["entry"]["domain"], "vortex.data.microsoft.com");

    let blocklisted = json(winspector().args(["domain", "ads.msn.com"]));
    assert_eq!(blocklisted["verdict"], "blocklisted");
    assert_eq!(blocklisted["entry"]["group"], "Advertising");

    winspector()
        .args(["domain", "example.org"])
        .assert()
        .success()
        .stdout(predicate::str::contains("example.org: unknown"));
}

#[test]
fn profile_detects_gamer_and_falls_back_to_home_user() {
    let gamer = json(winspector().args([
        "profile",
        "--path",
        r"C:\Program Files (x86)\Steam\steamapps\common",
        "--app",
        "Steam",
    ]));
    assert_eq!(gamer["personas"], serde_json::json!(["Gamer"]));
    assert_eq!(gamer["scores"][0]["score"], 2);

    let nobody = json(winspector().arg("profile"));
    assert_eq!(nobody["personas"], serde_json::json!(["HomeUser"]));
}

#[test]
fn vet_plan_filters_critical_and_low_safety_items() {
    let dir = TempDir::new().expect("tempdir");
    let plan = dir.path().join("plan.json");
    fs::write(
        &plan,
        r#"{
            "action_plan": [
                {"type": "service", "id": "WinDefend", "action": "disable"},
                {"type": "service", "id": "DiagTrack", "action": "disable", "reason": "telemetry"}
            ],
            "cleanup_plan": {
                "python_pip_cache": {"clean": true},
                "crash_dumps": {"clean": true}
            }
        }"#,
    )
    .expect("write plan");

    let review = json(winspector().arg("vet-plan").arg(&plan).args(["--persona", "developer"]));

    let accepted = &review["accepted"];
    assert_eq!(accepted["action_plan"].as_array().map(Vec::len), Some(1));
    assert_eq!(accepted["action_plan"][0]["reason"], "telemetry");
    assert_eq!(accepted["cleanup_plan"]["python_pip_cache"]["clean"], false);
    assert_eq!(accepted["cleanup_plan"]["crash_dumps"]["clean"], true);

    let reasons: Vec<_> =
        review["rejected"].as_array().expect("rejected list").iter().map(|r| r["reason"].clone()).collect();
    assert!(reasons.contains(&serde_json::json!("critical_component")));
    assert!(reasons.contains(&serde_json::json!("sensitive_persona")));
}

#[test]
fn rules_lists_categories() {
    winspector()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("python_pip_cache (direct, safety low)"))
        .stdout(predicate::str::contains("user_temp_files (heuristic, safety high)"));
}

#[test]
fn missing_knowledge_base_fails() {
    let dir = TempDir::new().expect("tempdir");
    let config = dir.path().join("winspector.toml");
    fs::write(&config, "[knowledge]\nkb_path = \"nowhere.yaml\"\n").expect("write config");

    Command::new(env!("CARGO_BIN_EXE_winspector"))
        .arg("--config")
        .arg(&config)
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nowhere.yaml"));
}
