//! Lightweight parse/render/iconize/emit benchmark harness for local baselines.
//!
//! Run from repository root:
//! `cargo run -p combo_notation_core --example pipeline_benchmark --release`

use std::time::Instant;

use combo_notation_core::dom::emit::{EmitConfig, emit_blocks};
use combo_notation_core::render::{RenderOptions, render_document};
use combo_notation_core::{RenderMode, parse_document};
use combo_notation_profile::ProfileStore;

const COMBOS: &[&str] = &[
    "=:2A 5B j.C:=",
    "=:cr.HS > 236D(2), j.[S] ~ OD:=",
    "=:5A 2B 236236C dash 6P~RC:=",
    "=:2x4 jc.K dl.P 41236HS:=",
];

fn sample_document(paragraphs: usize) -> String {
    let mut out = String::from("---\nprofile: asw\n---\n`comboButton`\n\n");
    for i in 0..paragraphs {
        let combo = COMBOS[i % COMBOS.len()];
        out.push_str(&format!("Route {i}: start with {combo} then confirm.\n\n"));
    }
    out
}

fn per_iter_ms(elapsed: std::time::Duration, iterations: usize) -> f64 {
    elapsed.as_secs_f64() * 1000.0 / iterations as f64
}

fn run_benchmark(label: &str, input: &str, store: &ProfileStore, iterations: usize) {
    let config = EmitConfig::default();
    let text = RenderOptions::default();
    let icons = RenderOptions {
        mode: RenderMode::Icon,
        ..RenderOptions::default()
    };

    let parse_start = Instant::now();
    for _ in 0..iterations {
        let _ = parse_document(input);
    }
    let parse_elapsed = parse_start.elapsed();

    let text_start = Instant::now();
    for _ in 0..iterations {
        let _ = render_document(parse_document(input), store, &text);
    }
    let text_elapsed = text_start.elapsed();

    let icon_start = Instant::now();
    for _ in 0..iterations {
        let _ = render_document(parse_document(input), store, &icons);
    }
    let icon_elapsed = icon_start.elapsed();

    let rendered = render_document(parse_document(input), store, &icons);
    let emit_start = Instant::now();
    for _ in 0..iterations {
        let _ = emit_blocks(&rendered.blocks, &config);
    }
    let emit_elapsed = emit_start.elapsed();

    println!("Benchmark: {label}");
    println!("  input_bytes: {}", input.len());
    println!("  notations:   {}", rendered.report.notations);
    println!(
        "  parse:  total={parse_elapsed:?}, per_iter={:.3} ms",
        per_iter_ms(parse_elapsed, iterations)
    );
    println!(
        "  text:   total={text_elapsed:?}, per_iter={:.3} ms",
        per_iter_ms(text_elapsed, iterations)
    );
    println!(
        "  icons:  total={icon_elapsed:?}, per_iter={:.3} ms",
        per_iter_ms(icon_elapsed, iterations)
    );
    println!(
        "  emit:   total={emit_elapsed:?}, per_iter={:.3} ms",
        per_iter_ms(emit_elapsed, iterations)
    );
}

fn main() {
    let iterations = std::env::var("COMBO_BENCH_ITERS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(200);
    let store = ProfileStore::new();

    for (label, paragraphs) in [("short_note", 8), ("long_note", 400)] {
        run_benchmark(label, &sample_document(paragraphs), &store, iterations);
    }
}
