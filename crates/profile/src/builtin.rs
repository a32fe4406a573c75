//! The three profiles shipped with the plugin.

use crate::Profile;

/// Ids of the built-in profiles, in display order.
pub const BUILTIN_IDS: [&str; 3] = ["asw", "alt", "trd"];

type InputRow = (&'static str, &'static str, &'static str);

const ASW: &[InputRow] = &[
    ("A", "#DE1616", "Weak Attack, Weak Punch"),
    ("B", "#1F8CCC", "Strong Attack, Weak Kick"),
    ("C", "#009E4E", "Heavy Attack, Strong Punch, Clash"),
    ("D", "#E8982C", "Strong Kick, Drive, Dust, Homing Dash, Change"),
    ("E", "#892CE8", "Arcana, Extra Attack"),
    ("K", "#1F8CCC", "Kick"),
    ("P", "#FF87D1", "Punch, Partner"),
    ("S", "#009E4E", "Slash, Special"),
    ("HS", "#DE1616", "Heavy Slash"),
    ("MS", "#E8982C", "MP Skill"),
    ("OD", "#892CE8", "Overdrive"),
    ("RC", "#DE1616", "Rapid Cancel, Roman Cancel"),
    ("DRC", "#DE1616", "Drift Roman Cancel"),
    ("YRC", "#E8982C", "Yellow Roman Cancel"),
    ("BRC", "#1F8CCC", "Blue Roman Cancel"),
    ("PRC", "#892CE8", "Purple Roman Cancel"),
];

const ALT: &[InputRow] = &[
    ("A", "#009E4E", "A Button"),
    ("B", "#DE1616", "B Button"),
    ("X", "#1F8CCC", "X Button"),
    ("Y", "#E8982C", "Y Button"),
    ("L", "#1F8CCC", "Light Attack"),
    ("M", "#E8982C", "Medium Attack"),
    ("H", "#DE1616", "Heavy Attack"),
    ("S", "#009E4E", "Special Attack"),
    ("U", "#FF87D1", "Unique Attack"),
    ("A1", "#892CE8", "Assist 1"),
    ("A2", "#892CE8", "Assist 2"),
];

const TRD: &[InputRow] = &[
    ("P", "#FF87D1", "Any Punch"),
    ("K", "#892CE8", "Any Kick"),
    ("LP", "#1F8CCC", "Light Punch"),
    ("MP", "#E8982C", "Medium Punch"),
    ("HP", "#DE1616", "Heavy Punch"),
    ("LK", "#1F8CCC", "Light Kick"),
    ("MK", "#E8982C", "Medium Kick"),
    ("HK", "#DE1616", "Heavy Kick"),
    ("DI", "#009E4E", "Drive Impact"),
    ("DR", "#009E4E", "Drive Rush"),
    ("VT", "#DE1616", "V-Trigger"),
];

fn build(id: &str, name: &str, rows: &[InputRow]) -> Profile {
    let mut profile = Profile::new(id, name);
    for (label, color, desc) in rows {
        profile.colors.set(*label, *color);
        profile.descriptions.insert((*label).into(), (*desc).into());
    }
    profile.default_colors = Some(profile.colors.clone());
    profile
}

/// Fresh copies of the built-in profiles, in [`BUILTIN_IDS`] order.
pub fn builtin_profiles() -> Vec<Profile> {
    vec![
        build("asw", "ASW Standard", ASW),
        build("alt", "Modern Alt", ALT),
        build("trd", "Traditional", TRD),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_validate() {
        for profile in builtin_profiles() {
            profile.validate().unwrap();
        }
    }

    #[test]
    fn builtin_ids_match_profiles() {
        let ids: Vec<String> = builtin_profiles().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, BUILTIN_IDS);
    }

    #[test]
    fn asw_declares_shipped_colors_in_order() {
        let asw = &builtin_profiles()[0];
        let first: Vec<(&str, &str)> = asw
            .colors
            .iter()
            .take(3)
            .map(|e| (e.label.as_str(), e.color.as_str()))
            .collect();
        assert_eq!(
            first,
            [("A", "#DE1616"), ("B", "#1F8CCC"), ("C", "#009E4E")]
        );
        assert_eq!(asw.default_colors.as_ref(), Some(&asw.colors));
        assert_eq!(asw.description_of("HS"), Some("Heavy Slash"));
    }
}
