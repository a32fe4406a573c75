mod render;

use std::fs;
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use combo_notation_core::dom::emit::{EmitConfig, emit_blocks};
use combo_notation_core::notation::{PatternRegistry, colorize, iconize_segments};
use combo_notation_core::render::{RenderOptions, render_document};
use combo_notation_core::{RenderMode, parse_document};
use combo_notation_diagnostics::{self as diag, Diagnostic, Severity};
use combo_notation_profile::{
    Profile, ProfileStore, Settings, load_profile_from_str, load_settings_from_str,
};

use crate::render::{
    Format, icons_pretty, print_summary, render_diagnostics_pretty, segments_pretty,
};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "combo",
    version,
    about = "Combo notation: render, colorize, and iconize fighting-game notation"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Settings JSON (custom profiles, metadata key, icon base).
    #[arg(long, global = true)]
    settings: Option<String>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    // ── Documents ───────────────────────────────────────────────────
    /// Render a Markdown note to HTML with its notation colorized.
    Render {
        file: String,
        /// Profile to use instead of the one in the frontmatter.
        #[arg(long)]
        profile: Option<String>,
        /// Render notation as glyphs instead of colored text.
        #[arg(long)]
        icons: bool,
    },

    // ── Snippets ────────────────────────────────────────────────────
    /// Colorize one notation string.
    Colorize {
        text: String,
        /// Profile id (defaults to the selected profile in settings).
        #[arg(long)]
        profile: Option<String>,
    },

    /// Convert one notation string to glyphs.
    Iconize {
        text: String,
        /// Profile id (defaults to the selected profile in settings).
        #[arg(long)]
        profile: Option<String>,
    },

    // ── Profiles ────────────────────────────────────────────────────
    /// List available profiles.
    Profiles,

    /// Validate a profile JSON file.
    CheckProfile { file: String },

    // ── Reference ───────────────────────────────────────────────────
    /// Explain a diagnostic ID (e.g. CN1001).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let format = Format::resolve_or_detect(cli.output.as_deref());
    let settings = cli.settings.as_deref();

    match cli.cmd {
        Cmd::Render {
            file,
            profile,
            icons,
        } => cmd_render(&file, profile.as_deref(), icons, settings, format)?,
        Cmd::Colorize { text, profile } => {
            cmd_colorize(&text, profile.as_deref(), settings, format)?
        }
        Cmd::Iconize { text, profile } => cmd_iconize(&text, profile.as_deref(), settings, format)?,
        Cmd::Profiles => cmd_profiles(settings, format)?,
        Cmd::CheckProfile { file } => cmd_check_profile(&file, format)?,
        Cmd::Explain { id } => cmd_explain(&id, format)?,
    }

    Ok(())
}

/// Log to stderr, filtered by `COMBO_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("COMBO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_render(
    file: &str,
    profile: Option<&str>,
    icons: bool,
    settings_path: Option<&str>,
    format: Format,
) -> Result<()> {
    let input = fs::read_to_string(file).with_context(|| format!("failed to read '{file}'"))?;
    let (settings, store) = load_store(settings_path)?;

    let options = RenderOptions {
        metadata_key: &settings.metadata_key,
        profile_override: profile,
        mode: if icons {
            RenderMode::Icon
        } else {
            RenderMode::Text
        },
    };
    let rendered = render_document(parse_document(&input), &store, &options);
    let config = EmitConfig {
        icon_base: settings.icon_base.clone(),
    };
    let html = emit_blocks(&rendered.blocks, &config);
    let diagnostics = &rendered.report.diagnostics;

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "profile": rendered.profile,
                "notations": rendered.report.notations,
                "html": html,
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // HTML to stdout, diagnostics to stderr.
            print!("{html}");
            render_diagnostics_pretty(&input, file, diagnostics);
            print_summary(diagnostics);
        }
    }

    exit_on_errors(diagnostics);
    Ok(())
}

fn cmd_colorize(
    text: &str,
    profile: Option<&str>,
    settings_path: Option<&str>,
    format: Format,
) -> Result<()> {
    let (profile, registry) = resolve_registry(profile, settings_path)?;
    let segments = colorize(text, &registry);

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "profile": profile.id,
                "segments": segments,
                "diagnostics": registry.diagnostics(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            println!("{}", segments_pretty(&segments));
            render_diagnostics_pretty(text, "<input>", registry.diagnostics());
        }
    }
    Ok(())
}

fn cmd_iconize(
    text: &str,
    profile: Option<&str>,
    settings_path: Option<&str>,
    format: Format,
) -> Result<()> {
    let (profile, registry) = resolve_registry(profile, settings_path)?;
    let nodes = iconize_segments(&colorize(text, &registry), &registry);

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "profile": profile.id,
                "nodes": nodes,
                "diagnostics": registry.diagnostics(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            println!("{}", icons_pretty(&nodes));
            render_diagnostics_pretty(text, "<input>", registry.diagnostics());
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ProfileRow<'a> {
    id: &'a str,
    name: &'a str,
    builtin: bool,
    inputs: Vec<&'a str>,
}

fn cmd_profiles(settings_path: Option<&str>, format: Format) -> Result<()> {
    let (settings, store) = load_store(settings_path)?;
    let rows: Vec<ProfileRow<'_>> = store
        .iter()
        .map(|p| ProfileRow {
            id: &p.id,
            name: &p.name,
            builtin: store.is_builtin(&p.id),
            inputs: p.colors.labels().collect(),
        })
        .collect();

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "selected": settings.selected_profile,
                "profiles": rows,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            for row in &rows {
                let marker = if row.id == settings.selected_profile {
                    "*"
                } else {
                    " "
                };
                let kind = if row.builtin { "built-in" } else { "custom" };
                println!(
                    "{marker} {:<8} {:<16} {:<9} {}",
                    row.id,
                    row.name,
                    kind,
                    row.inputs.join(" ")
                );
            }
        }
    }
    Ok(())
}

fn cmd_check_profile(file: &str, format: Format) -> Result<()> {
    let input = fs::read_to_string(file).with_context(|| format!("failed to read '{file}'"))?;
    let profile = match load_profile_from_str(&input) {
        Ok(p) => p,
        Err(e) => {
            match format {
                Format::Json => {
                    let out = serde_json::json!({ "ok": false, "file": file, "error": e.to_string() });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                Format::Pretty => eprintln!("{file}: {e}"),
            }
            process::exit(1);
        }
    };

    // Labels are checked here rather than at load time: a bad label only
    // disables that one input.
    let registry = PatternRegistry::build(&profile);
    let diagnostics = registry.diagnostics();

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "ok": true,
                "file": file,
                "profile": profile.id,
                "inputs": registry.inputs().len(),
                "diagnostics": diagnostics,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            render_diagnostics_pretty(&input, file, diagnostics);
            print_summary(diagnostics);
            eprintln!(
                "profile ok: {} ({} of {} inputs usable)",
                profile.id,
                registry.inputs().len(),
                profile.colors.len()
            );
        }
    }
    exit_on_errors(diagnostics);
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let text = diag::explain(id);
            let out = serde_json::json!({
                "id": id,
                "explanation": text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Explanation is the expected output, so stdout.
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{id}: (no explanation available)");
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Exit with code 1 if any diagnostic is an error.
/// Warnings and info do not cause a non-zero exit.
fn exit_on_errors(diagnostics: &[Diagnostic]) {
    if diagnostics
        .iter()
        .any(|d| matches!(d.severity, Severity::Error))
    {
        process::exit(1);
    }
}

/// Settings from `path` (defaults when absent) and the store they imply.
fn load_store(path: Option<&str>) -> Result<(Settings, ProfileStore)> {
    let settings = match path {
        Some(path) => {
            let json =
                fs::read_to_string(path).with_context(|| format!("failed to read '{path}'"))?;
            load_settings_from_str(&json).with_context(|| format!("invalid settings '{path}'"))?
        }
        None => Settings::default(),
    };
    let store = ProfileStore::from_settings(&settings).context("invalid custom profiles")?;
    Ok((settings, store))
}

/// Profile snapshot and registry for `explicit`, or the selected profile.
fn resolve_registry(
    explicit: Option<&str>,
    settings_path: Option<&str>,
) -> Result<(Arc<Profile>, PatternRegistry)> {
    let (settings, store) = load_store(settings_path)?;
    let id = explicit.unwrap_or(&settings.selected_profile);
    let profile = store.snapshot(id).ok_or_else(|| {
        let known: Vec<&str> = store.ids().collect();
        anyhow!("unknown profile '{id}' (available: {})", known.join(", "))
    })?;
    tracing::debug!(profile = %profile.id, "resolved profile");
    let registry = PatternRegistry::build(&profile);
    Ok((profile, registry))
}
