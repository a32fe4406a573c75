//! CLI tests for `combo explain` across every diagnostic code.

use std::process::{Command, Output};

use assert_cmd::cargo;
use combo_notation_diagnostics::{codes, explain};

fn explain_as(id: &str, output: &str) -> Output {
    Command::new(cargo::cargo_bin!("combo"))
        .args(["explain", id, "--output", output])
        .output()
        .expect("run explain command")
}

fn json_of(output: &Output) -> serde_json::Value {
    serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).expect("valid json")
}

#[test]
fn every_code_has_a_json_explanation() {
    for &id in codes::ALL {
        let output = explain_as(id, "json");
        assert!(output.status.success(), "{id}");
        let json = json_of(&output);
        assert_eq!(json["id"], id);
        assert_eq!(json["explanation"].as_str(), explain(id), "{id}");
    }
}

#[test]
fn every_code_has_a_pretty_explanation() {
    for &id in codes::ALL {
        let output = explain_as(id, "pretty");
        assert!(output.status.success(), "{id}");
        let stdout = String::from_utf8_lossy(&output.stdout);
        let text = explain(id).expect("known code");
        assert!(stdout.contains(id), "{stdout}");
        assert!(stdout.contains(text), "{stdout}");
    }
}

#[test]
fn stale_view_is_explained_as_informational() {
    let json = json_of(&explain_as(codes::STALE_VIEW, "json"));
    assert_eq!(json["id"], "CN3001");
    assert!(
        json["explanation"]
            .as_str()
            .is_some_and(|t| t.contains("closed")),
        "{json}"
    );
}

#[test]
fn unknown_code_is_null_in_json_and_noted_in_pretty() {
    let json = json_of(&explain_as("CN9999", "json"));
    assert_eq!(json["id"], "CN9999");
    assert!(json["explanation"].is_null());

    let output = explain_as("CN9999", "pretty");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("CN9999: (no explanation available)"), "{stdout}");
}
