//! Fixed motion and direction glyph table, plus button glyph rendering.
//!
//! The table is profile-independent and ordered by priority: multi-input
//! motions come before single directions, which come before jump and timing
//! modifiers. Profile buttons are matched after everything listed here.

use serde::Serialize;

/// How an alias is anchored when matched against notation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasKind {
    /// Letter shorthand such as `qcf.` or `dash`. Needs a word boundary before.
    Shorthand,
    /// Multi-digit numpad motion such as `236`. Needs a word boundary before
    /// and must not be followed by a digit or `.`.
    Motion,
    /// Single numpad direction such as `2`. Also allowed after an `x` that
    /// itself follows a digit (the `4` of `2x4`); must not be followed by a digit, `.`, `)`, or a
    /// lowercase letter; yields to a following multiplier (`2x3`).
    Direction,
    /// Upper-case word such as `DC` or `ADDF`. Needs a word boundary on
    /// both sides and must not be followed by `:`.
    Word,
}

impl AliasKind {
    /// Whether this alias is skipped when a multiplier (`x` + digit) follows.
    pub fn yields_to_multiplier(self) -> bool {
        matches!(self, AliasKind::Direction)
    }
}

/// How a glyph is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayClass {
    /// Regular motion or direction image.
    Motion,
    /// Jump, cancel, and timing modifiers.
    Modifier,
    /// Present in the output but not shown (neutral).
    Hidden,
}

impl DisplayClass {
    /// CSS class used for the glyph element.
    pub fn css_class(self) -> &'static str {
        match self {
            DisplayClass::Motion => "normStyle",
            DisplayClass::Modifier => "modStyle",
            DisplayClass::Hidden => "hideStyle",
        }
    }
}

/// A literal alias and how it is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alias {
    /// Exact text to match.
    pub text: &'static str,
    /// Anchoring rules.
    pub kind: AliasKind,
}

/// One motion, direction, or modifier glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionGlyph {
    /// Glyph name, also used as image alt text (e.g. `"QCF"`).
    pub name: &'static str,
    /// Image asset file name, relative to the configured icon base.
    pub file: &'static str,
    /// Display class.
    pub class: DisplayClass,
    /// How many copies of the image one match produces.
    pub repeat: u8,
    /// Alternative spellings, tried in order.
    pub aliases: &'static [Alias],
}

const fn sh(text: &'static str) -> Alias {
    Alias {
        text,
        kind: AliasKind::Shorthand,
    }
}

const fn mo(text: &'static str) -> Alias {
    Alias {
        text,
        kind: AliasKind::Motion,
    }
}

const fn dir(text: &'static str) -> Alias {
    Alias {
        text,
        kind: AliasKind::Direction,
    }
}

const fn word(text: &'static str) -> Alias {
    Alias {
        text,
        kind: AliasKind::Word,
    }
}

const fn glyph(
    name: &'static str,
    file: &'static str,
    class: DisplayClass,
    repeat: u8,
    aliases: &'static [Alias],
) -> MotionGlyph {
    MotionGlyph {
        name,
        file,
        class,
        repeat,
        aliases,
    }
}

use DisplayClass::{Hidden, Modifier, Motion};

/// Motion, direction, and modifier glyphs in match priority order.
pub static MOTION_GLYPHS: &[MotionGlyph] = &[
    // Motions
    glyph("QCF", "236.png", Motion, 1, &[sh("qcf."), mo("236")]),
    glyph("QCB", "214.png", Motion, 1, &[sh("qcb."), mo("214")]),
    glyph("DP", "623.png", Motion, 1, &[sh("dp."), mo("623")]),
    glyph("RDP", "421.png", Motion, 1, &[sh("rdp."), mo("421")]),
    glyph("HCF", "41236.png", Motion, 1, &[sh("hcf."), mo("41236")]),
    glyph("HCF", "41236.png", Motion, 1, &[sh("hcfb."), mo("412364")]),
    glyph("HCB", "63214.png", Motion, 1, &[sh("hcb."), mo("63214")]),
    glyph("HCB", "63214.png", Motion, 1, &[sh("hcbf."), mo("632146")]),
    glyph("QCF", "236.png", Motion, 2, &[sh("2qcf."), mo("236236")]),
    glyph("QCB", "214.png", Motion, 2, &[sh("2qcb."), mo("214214")]),
    glyph("Down", "2.png", Motion, 2, &[sh("dd."), mo("22")]),
    glyph("Back", "4.png", Motion, 2, &[sh("backdash"), sh("back dash"), mo("44")]),
    glyph("Forward", "6.png", Motion, 2, &[sh("dash"), mo("66")]),
    glyph("Up", "8.png", Motion, 2, &[sh("uu."), mo("88")]),
    // Directions
    glyph("DownBack", "1.png", Motion, 1, &[sh("db."), dir("1")]),
    glyph("Down", "2.png", Motion, 1, &[sh("cr."), dir("2")]),
    glyph("DownForward", "3.png", Motion, 1, &[sh("df."), dir("3")]),
    glyph("Back", "4.png", Motion, 1, &[sh("b."), dir("4")]),
    glyph("Neutral", "5.png", Hidden, 1, &[sh("st."), dir("5")]),
    glyph("Forward", "6.png", Motion, 1, &[sh("f."), dir("6")]),
    glyph("UpBack", "7.png", Motion, 1, &[sh("ub."), dir("7")]),
    glyph("Up", "8.png", Motion, 1, &[sh("u."), dir("8")]),
    glyph("UpForward", "9.png", Motion, 1, &[sh("uf."), dir("9")]),
    glyph("DashCancel", "DC.png", Modifier, 1, &[word("DC")]),
    // Modifiers
    glyph("Jump", "J.png", Modifier, 1, &[sh("j.")]),
    glyph("JumpCancel", "jc.png", Modifier, 1, &[sh("jc.")]),
    glyph("DoubleJump", "dj.png", Modifier, 1, &[sh("dj.")]),
    glyph("SuperJump", "sj.png", Modifier, 1, &[sh("sj.")]),
    glyph("Delay", "dl.png", Modifier, 1, &[sh("dl.")]),
    glyph("Close", "cl.png", Modifier, 1, &[sh("cl.")]),
    glyph("SuperDash", "SD.png", Modifier, 1, &[word("SD")]),
    glyph("AirDashForward", "ADF.png", Modifier, 1, &[word("ADF")]),
    glyph("AirDashDown", "ADD.png", Modifier, 1, &[word("ADD")]),
    glyph("AirDashDownForward", "ADDF.png", Modifier, 1, &[word("ADDF")]),
];

/// Font size for a button label of `label_len` characters, in SVG units of
/// a 100x100 view box.
pub fn button_font_size(label_len: usize) -> u32 {
    match label_len {
        0 | 1 => 80,
        2 => 60,
        3 => 50,
        n => 80u32.saturating_sub(10 * n as u32).max(30),
    }
}

/// Inline SVG for a button glyph: a white disc with the label centred on it.
///
/// `label` must already be safe to embed in markup; labels accepted by the
/// pattern registry are ASCII word characters only.
pub fn button_svg(label: &str, text_color: &str) -> String {
    let size = button_font_size(label.chars().count());
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 100 100\">\
         <circle cx=\"50\" cy=\"50\" r=\"45\" fill=\"white\"/>\
         <text x=\"50\" y=\"50\" text-anchor=\"middle\" dominant-baseline=\"central\" \
         font-family=\"Arial\" font-weight=\"bold\" font-size=\"{size}\" fill=\"{text_color}\">\
         {label}</text></svg>"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_size_by_label_length() {
        assert_eq!(button_font_size(1), 80);
        assert_eq!(button_font_size(2), 60);
        assert_eq!(button_font_size(3), 50);
        assert_eq!(button_font_size(4), 40);
        assert_eq!(button_font_size(5), 30);
        assert_eq!(button_font_size(9), 30);
    }

    #[test]
    fn svg_carries_label_and_fill() {
        let svg = button_svg("HS", "#000000");
        assert!(svg.contains("font-size=\"60\""), "{svg}");
        assert!(svg.contains("fill=\"#000000\">HS</text>"), "{svg}");
    }

    #[test]
    fn only_directions_yield_to_multipliers() {
        for g in MOTION_GLYPHS {
            for alias in g.aliases {
                let single_digit = alias.text.len() == 1 && alias.text.as_bytes()[0].is_ascii_digit();
                assert_eq!(alias.kind.yields_to_multiplier(), single_digit, "{}", alias.text);
            }
        }
    }

    #[test]
    fn doubled_motions_repeat_twice() {
        let doubled: Vec<&str> = MOTION_GLYPHS
            .iter()
            .filter(|g| g.repeat == 2)
            .flat_map(|g| g.aliases.iter().map(|a| a.text))
            .collect();
        assert!(doubled.contains(&"236236"));
        assert!(doubled.contains(&"2qcb."));
        assert!(doubled.contains(&"66"));
    }
}
