use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

const AIRCRAFT: &str = "../../configs/aircraft";
const CONFIG: &str = "../../configs/vnav.toml";

#[test]
fn reroute_session_publishes_and_reports_pseudo_waypoints() {
    let dir = tempfile::tempdir().expect("tempdir");
    let json_path = dir.path().join("profile.json");

    Command::cargo_bin("vnav")
        .expect("vnav bin")
        .args([
            "--session",
            "../../configs/sessions/reroute.yaml",
            "--config",
            CONFIG,
            "--aircraft",
            AIRCRAFT,
            "--json",
            json_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("geometry (4 legs): published"))
        .stdout(predicate::str::contains("geometry (5 legs): published"))
        .stdout(predicate::str::contains("unchanged"))
        .stdout(predicate::str::contains("(T/C)"))
        .stdout(predicate::str::contains("(T/D)"))
        .stdout(predicate::str::contains("(DECEL)"))
        .stdout(predicate::str::contains("4 published, 0 failed"));

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).expect("json")).expect("valid json");
    assert_eq!(document["metadata"]["flight_plan"], "LFBO-LFPO via LMG");
    assert_eq!(document["metadata"]["cruise_altitude_ft"], 37_000.0);
    assert!(document["climb"].is_object());
    assert!(document["descent"]["top_of_descent"].is_object());
}

#[test]
fn climb_absent_without_config_switch() {
    let dir = tempfile::tempdir().expect("tempdir");
    let json_path = dir.path().join("profile.json");

    Command::cargo_bin("vnav")
        .expect("vnav bin")
        .args([
            "--session",
            "../../configs/sessions/reroute.yaml",
            "--aircraft",
            AIRCRAFT,
            "--json",
            json_path.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("(T/C)").not());

    let document: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).expect("json")).expect("valid json");
    assert!(document["climb"].is_null());
    assert!(document["approach"].is_object());
}

#[test]
fn empty_plan_session_never_publishes() {
    Command::cargo_bin("vnav")
        .expect("vnav bin")
        .args([
            "--session",
            "../../configs/sessions/empty_plan.yaml",
            "--aircraft",
            AIRCRAFT,
            "--climb",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped, no legs"))
        .stdout(predicate::str::contains("0 published, 0 failed"))
        .stdout(predicate::str::contains("Generation      : 0"));
}

#[test]
fn unknown_aircraft_is_an_error() {
    Command::cargo_bin("vnav")
        .expect("vnav bin")
        .args([
            "--session",
            "../../configs/sessions/reroute.yaml",
            "--aircraft",
            AIRCRAFT,
            "--aircraft-name",
            "B738",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("B738"));
}

#[test]
fn profile_plot_renders_png_from_export() {
    let dir = tempfile::tempdir().expect("tempdir");
    let json_path = dir.path().join("profile.json");
    let png_path = dir.path().join("profile.png");

    Command::cargo_bin("vnav")
        .expect("vnav bin")
        .args([
            "--session",
            "../../configs/sessions/reroute.yaml",
            "--config",
            CONFIG,
            "--aircraft",
            AIRCRAFT,
            "--json",
            json_path.to_str().unwrap(),
        ])
        .assert()
        .success();

    Command::cargo_bin("profile_plot")
        .expect("profile_plot bin")
        .args([
            "--input",
            json_path.to_str().unwrap(),
            "--output",
            png_path.to_str().unwrap(),
            "--width",
            "400",
            "--height",
            "300",
        ])
        .assert()
        .success();

    let metadata = fs::metadata(png_path).expect("png metadata");
    assert!(metadata.len() > 0, "PNG output should not be empty");
}
