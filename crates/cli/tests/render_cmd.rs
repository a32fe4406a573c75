//! CLI tests for the `combo render` subcommand.

use std::fs;
use std::process::Command;

use assert_cmd::cargo;

fn combo_cmd() -> Command {
    Command::new(cargo::cargo_bin!("combo"))
}

fn write_temp(name: &str, content: &str) -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write temp file");
    (dir, path.to_string_lossy().to_string())
}

fn render_json(args: &[&str]) -> (Option<i32>, serde_json::Value) {
    let output = combo_cmd()
        .args(["render"])
        .args(args)
        .args(["--output", "json"])
        .output()
        .expect("run render");
    let stdout = String::from_utf8_lossy(&output.stdout);
    let json = serde_json::from_str(&stdout).unwrap_or_else(|e| {
        panic!(
            "invalid json ({e}): {stdout}\nstderr={}",
            String::from_utf8_lossy(&output.stderr)
        )
    });
    (output.status.code(), json)
}

#[test]
fn render_colors_inputs_from_frontmatter_profile() {
    let (_dir, path) = write_temp("note.md", "---\nprofile: asw\n---\nBnB =:2A 5B j.C:=\n");
    let (code, json) = render_json(&[&path]);

    assert_eq!(code, Some(0));
    assert_eq!(json["profile"], "asw");
    assert_eq!(json["notations"], 1);
    let html = json["html"].as_str().unwrap();
    assert!(html.contains("<span data-input=\"A\" style=\"color: #DE1616\">2A</span>"), "{html}");
    assert!(html.contains("<span data-input=\"C\" style=\"color: #009E4E\">j.C</span>"), "{html}");
    assert_eq!(json["diagnostics"].as_array().unwrap().len(), 0);
}

#[test]
fn render_without_profile_warns_but_succeeds() {
    let (_dir, path) = write_temp("note.md", "=:A B:=\n");
    let (code, json) = render_json(&[&path]);

    assert_eq!(code, Some(0));
    assert!(json["profile"].is_null());
    let html = json["html"].as_str().unwrap();
    assert!(html.contains("notation warning"), "{html}");
    assert!(html.contains("[ No notation profile in frontmatter ]"), "{html}");
    assert_eq!(json["diagnostics"][0]["id"], "CN1001");
    assert_eq!(json["diagnostics"][0]["severity"], "warn");
}

#[test]
fn render_icons_with_settings_icon_base() {
    let (_dir, note) = write_temp("note.md", "---\nprofile: asw\n---\n=:236C:=\n");
    let (_sdir, settings) = write_temp("settings.json", r#"{ "icon_base": "/glyphs/" }"#);
    let (code, json) = render_json(&[&note, "--icons", "--settings", &settings]);

    assert_eq!(code, Some(0));
    let html = json["html"].as_str().unwrap();
    assert!(html.contains("image-notation"), "{html}");
    assert!(html.contains("<img src=\"/glyphs/236.png\""), "{html}");
    assert!(html.contains("<svg"), "{html}");
}

#[test]
fn render_profile_flag_overrides_frontmatter() {
    let (_dir, path) = write_temp("note.md", "---\nprofile: asw\n---\n=:A:=\n");
    let (code, json) = render_json(&[&path, "--profile", "alt"]);

    assert_eq!(code, Some(0));
    assert_eq!(json["profile"], "alt");
    assert!(json["html"].as_str().unwrap().contains("#009E4E"));
}

#[test]
fn render_missing_file_fails() {
    let output = combo_cmd()
        .args(["render", "/definitely/not/here.md", "--output", "json"])
        .output()
        .expect("run render");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read"), "{stderr}");
}

#[test]
fn render_pretty_prints_html_on_stdout() {
    let (_dir, path) = write_temp("note.md", "---\nprofile: asw\n---\n`comboButton` =:A:=\n");
    let output = combo_cmd()
        .args(["render", &path, "--output", "pretty"])
        .output()
        .expect("run render");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("<p><button class=\"combo\">Icon Notation</button>"), "{stdout}");
}
