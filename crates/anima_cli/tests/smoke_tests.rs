//! CLI smoke tests: run the `anima` binary end to end.

use std::path::PathBuf;
use std::process::Command;

fn cli_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_anima"));
    cmd.env_remove("RUST_LOG").env_remove("ANIMA_PROFILES");
    cmd
}

fn write_temp(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("anima_smoke_{}_{}", std::process::id(), name));
    std::fs::write(&path, content).expect("failed to write temp file");
    path
}

#[test]
fn test_help_flag() {
    let output = cli_bin().arg("--help").output().expect("failed to run");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "Expected usage info in --help output");
}

#[test]
fn test_replay_prints_turns_and_snapshot() {
    let scenario = write_temp(
        "scene.toml",
        r#"
[[events]]
kind = "stimulus"
actor = "player"
tags = ["threat"]
intensity = 0.8

[[events]]
kind = "turn"
actor = "player"
"#,
    );

    // Missing profile file falls back to built-in defaults
    let output = cli_bin()
        .arg("--profiles")
        .arg("/tmp/nonexistent_anima_profiles_12345.toml")
        .arg("--scenario")
        .arg(&scenario)
        .arg("--snapshot")
        .output()
        .expect("failed to run");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("stdout line is not JSON"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["turn"], 1);
    assert!(lines[0]["impulses"]["withdraw"].as_f64().unwrap() > 0.0);
    let fear = lines[1]["snapshot"]["emotion"]["fear"].as_f64().unwrap();
    assert!((fear - 0.8).abs() < 1e-9);

    let _ = std::fs::remove_file(scenario);
}

#[test]
fn test_missing_scenario_fails() {
    let output = cli_bin()
        .arg("--scenario")
        .arg("/tmp/nonexistent_anima_scene_12345.toml")
        .output()
        .expect("failed to run");
    assert!(!output.status.success());
}
