//! Colorizer properties against the built-in profiles.

mod common;

use combo_notation_core::notation::{colorize, find_matches, plain_text, resolve_overlaps};
use common::{input_colors, input_labels, registry};

const SAMPLES: &[&str] = &[
    "2A 5B j.C",
    "cr.HS > 236D(2), j.[S] ~ OD",
    "A1 A2 5A 2B",
    "no inputs here",
    "2A2A 5B5B",
    "jc.K dl.P 6P~RC",
    "",
];

#[test]
fn asw_end_to_end_scenario() {
    let reg = registry("asw");
    let segs = colorize("2A 5B j.C", &reg);
    assert_eq!(
        input_labels(&segs),
        [
            ("2A".to_string(), "A".to_string()),
            ("5B".to_string(), "B".to_string()),
            ("j.C".to_string(), "C".to_string()),
        ]
    );
    assert_eq!(input_colors(&segs), ["#DE1616", "#1F8CCC", "#009E4E"]);
    let literals: Vec<&str> = segs
        .iter()
        .filter(|s| s.label().is_none())
        .map(|s| s.source_text())
        .collect();
    assert_eq!(literals, [" ", " "]);
}

#[test]
fn segments_reconstruct_text_without_overlap() {
    for id in ["asw", "alt", "trd"] {
        let reg = registry(id);
        for text in SAMPLES {
            let segs = colorize(text, &reg);
            assert_eq!(plain_text(&segs), *text, "profile {id}");
            let kept = resolve_overlaps(find_matches(text, &reg));
            for pair in kept.windows(2) {
                assert!(pair[0].end <= pair[1].start, "{id}: {pair:?}");
            }
        }
    }
}

#[test]
fn recolor_from_plain_text_is_stable() {
    for id in ["asw", "alt", "trd"] {
        let reg = registry(id);
        for text in SAMPLES {
            let first = colorize(text, &reg);
            let again = colorize(&plain_text(&first), &reg);
            assert_eq!(first, again, "profile {id}, text {text:?}");
        }
    }
}

#[test]
fn longer_label_is_one_token_in_alt() {
    let reg = registry("alt");
    let segs = colorize("A1", &reg);
    assert_eq!(input_labels(&segs), [("A1".to_string(), "A1".to_string())]);
    assert_eq!(segs.len(), 1);
}

#[test]
fn bracketed_and_counted_inputs() {
    let reg = registry("asw");
    let segs = colorize("[D] 236C(2)", &reg);
    assert_eq!(
        input_labels(&segs),
        [
            ("[D]".to_string(), "D".to_string()),
            ("236C(2)".to_string(), "C".to_string()),
        ]
    );
}

#[test]
fn token_inside_a_word_is_not_an_input() {
    let reg = registry("asw");
    let segs = colorize("OD HOD", &reg);
    assert_eq!(input_labels(&segs), [("OD".to_string(), "OD".to_string())]);
}

#[test]
fn numeric_prefix_is_part_of_the_token() {
    // `2A` reads as the A button with a down prefix, never as a glyph label.
    let reg = registry("asw");
    let segs = colorize("2A", &reg);
    assert_eq!(input_labels(&segs), [("2A".to_string(), "A".to_string())]);
}

#[test]
fn segments_serialize_with_kind_tags() {
    let reg = registry("asw");
    let json = serde_json::to_value(colorize("2A x", &reg)).unwrap();
    assert_eq!(
        json,
        serde_json::json!([
            {"kind": "input", "text": "2A", "label": "A", "color": "#DE1616"},
            {"kind": "text", "text": " x"},
        ])
    );
}
