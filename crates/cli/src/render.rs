//! Terminal output: ariadne diagnostics, colored segments, and glyph lists.
//!
//! Pretty output goes to the terminal with colors; JSON output is a single
//! document on stdout so it can be piped.

use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use combo_notation_core::notation::{IconNode, Segment};
use combo_notation_diagnostics::{Diagnostic, Severity};

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Coloured, source-annotated output (ariadne).
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Explicit choice, or pretty on a TTY and JSON when piped.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Severity mapping ────────────────────────────────────────────────────

fn report_kind(severity: &Severity) -> ReportKind<'static> {
    match severity {
        Severity::Error => ReportKind::Error,
        Severity::Warn => ReportKind::Warning,
        Severity::Info => ReportKind::Advice,
        _ => ReportKind::Warning,
    }
}

fn severity_color(severity: &Severity) -> Color {
    match severity {
        Severity::Error => Color::Red,
        Severity::Warn => Color::Yellow,
        Severity::Info => Color::Blue,
        _ => Color::White,
    }
}

fn context_note(diag: &Diagnostic) -> Option<String> {
    let ctx = diag.context.as_ref().filter(|c| !c.is_empty())?;
    Some(
        ctx.iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(", "),
    )
}

// ── Diagnostics ─────────────────────────────────────────────────────────

/// Render diagnostics to stderr. Diagnostics with a span are shown against
/// the source; the rest as one-line messages.
pub(crate) fn render_diagnostics_pretty(source: &str, filename: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    let config = Config::default().with_compact(false);
    let mut cache = (filename, Source::from(source));

    for diag in diagnostics {
        if let Some(span) = &diag.span {
            // Clamp span to source length to avoid panics on truncated input.
            let start = span.start.min(source.len());
            let end = span.end.min(source.len()).max(start);

            let label = context_note(diag).unwrap_or_else(|| diag.message.clone());
            let mut builder = Report::build(report_kind(&diag.severity), (filename, start..end))
                .with_code(diag.id.as_ref())
                .with_message(&diag.message)
                .with_config(config)
                .with_label(
                    Label::new((filename, start..end))
                        .with_message(label)
                        .with_color(severity_color(&diag.severity)),
                );
            if let Some(explanation) = diag.explain() {
                builder = builder.with_help(explanation);
            }
            builder.finish().eprint(&mut cache).ok();
        } else {
            let kind_str = match diag.severity {
                Severity::Error => "error",
                Severity::Warn => "warning",
                Severity::Info => "info",
                _ => "diagnostic",
            };
            eprintln!("{kind_str}[{}]: {}", diag.id, diag.message);
            if let Some(note) = context_note(diag) {
                eprintln!("  = note: {note}");
            }
            if let Some(explanation) = diag.explain() {
                eprintln!("  = help: {explanation}");
            }
        }
    }
}

/// Print a coloured summary line such as `1 error, 2 warnings`.
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    let (mut errors, mut warnings, mut infos) = (0usize, 0usize, 0usize);
    for d in diagnostics {
        match d.severity {
            Severity::Error => errors += 1,
            Severity::Warn => warnings += 1,
            Severity::Info => infos += 1,
            _ => warnings += 1,
        }
    }
    if errors + warnings + infos == 0 {
        return;
    }

    let mut parts = Vec::new();
    if errors > 0 {
        let s = if errors == 1 { "" } else { "s" };
        parts.push(format!("{}", format!("{errors} error{s}").fg(Color::Red)));
    }
    if warnings > 0 {
        let s = if warnings == 1 { "" } else { "s" };
        parts.push(format!(
            "{}",
            format!("{warnings} warning{s}").fg(Color::Yellow)
        ));
    }
    if infos > 0 {
        parts.push(format!("{}", format!("{infos} info").fg(Color::Blue)));
    }
    eprintln!("{}", parts.join(", "));
}

// ── Notation ────────────────────────────────────────────────────────────

/// `#RGB` or `#RRGGBB` to a terminal color.
pub(crate) fn hex_to_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        3 => {
            let mut it = digits.chars().map(|c| channel(&format!("{c}{c}")));
            Some(Color::Rgb(it.next()??, it.next()??, it.next()??))
        }
        6 => Some(Color::Rgb(
            channel(digits.get(0..2)?)?,
            channel(digits.get(2..4)?)?,
            channel(digits.get(4..6)?)?,
        )),
        _ => None,
    }
}

/// Segments as terminal text, each input in its profile color.
pub(crate) fn segments_pretty(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| match s.color().and_then(hex_to_color) {
            Some(color) => format!("{}", s.display_text().fg(color)),
            None => s.display_text().to_string(),
        })
        .collect()
}

/// Icon nodes as terminal text: glyphs in brackets, literals as-is.
pub(crate) fn icons_pretty(nodes: &[IconNode]) -> String {
    nodes
        .iter()
        .map(|n| {
            let color = match n {
                IconNode::Text { color, .. }
                | IconNode::Motion { color, .. }
                | IconNode::Button { color, .. } => color.as_deref().and_then(hex_to_color),
                _ => None,
            };
            let text = match n {
                IconNode::Text { text, .. } => text.clone(),
                other => format!("[{}]", other.glyph_name().unwrap_or_default()),
            };
            match color {
                Some(color) => format!("{}", text.fg(color)),
                None => text,
            }
        })
        .collect()
}
