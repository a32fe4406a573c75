//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection
//! and IDE autocomplete. Every code listed here has an entry in
//! [`crate::explain`].

/// Document declares no notation profile.
pub const MISSING_PROFILE: &str = "CN1001";

/// Document names a profile id that is not in the profile store.
pub const UNKNOWN_PROFILE: &str = "CN1002";

/// A profile input label cannot be turned into a token matcher.
pub const INVALID_INPUT_LABEL: &str = "CN2001";

/// Building the matcher for a well-formed input label failed.
pub const PATTERN_COMPILE_FAILED: &str = "CN2002";

/// A synchronization event addressed a view that no longer exists.
pub const STALE_VIEW: &str = "CN3001";

/// All known codes, in numeric order.
pub const ALL: &[&str] = &[
    MISSING_PROFILE,
    UNKNOWN_PROFILE,
    INVALID_INPUT_LABEL,
    PATTERN_COMPILE_FAILED,
    STALE_VIEW,
];

pub(crate) fn explanation(id: &str) -> Option<&'static str> {
    match id {
        "CN1001" => Some(
            "The document has no profile field in its metadata, so its notations are shown \
             with a placeholder instead of colors. Add `profile: <id>` to the frontmatter.",
        ),
        "CN1002" => Some(
            "The document's profile field names a profile that is neither built in nor \
             defined in the settings. Its notations are shown with a placeholder.",
        ),
        "CN2001" => Some(
            "An input label in the profile contains characters other than ASCII letters, \
             digits, or underscores. That input is skipped; every other input still renders.",
        ),
        "CN2002" => Some(
            "The token matcher for an input label could not be built (for example because it \
             exceeds the matcher size limit). That input is skipped.",
        ),
        "CN3001" => Some(
            "A synchronization event arrived for a view that has already been closed. \
             The event is ignored.",
        ),
        _ => None,
    }
}
