//! String truncation with length bookkeeping.
//!
//! Lengths are counted in characters, not bytes, so a cut never splits a
//! code point. Both views are raw text; markup escaping and line-break
//! markers are applied by the renderer afterwards.

use crate::config::StringLimits;

/// A string argument cut down to display size.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TruncatedString {
    /// At most `limits.inline` characters.
    pub inline: String,
    /// Expanded view; present only when the string did not fit inline.
    /// At most `limits.tooltip` characters.
    pub tooltip: Option<String>,
    /// The expanded view was cut as well.
    pub tooltip_truncated: bool,
    /// Character count of the captured string.
    pub original_len: usize,
}

impl TruncatedString {
    /// The inline view was cut.
    pub fn is_truncated(&self) -> bool {
        self.tooltip.is_some()
    }
}

/// Truncate `s` to the configured inline and tooltip sizes.
pub fn truncate(s: &str, limits: StringLimits) -> TruncatedString {
    let original_len = s.chars().count();
    let inline = prefix(s, limits.inline).to_string();

    if original_len <= limits.inline {
        return TruncatedString {
            inline,
            tooltip: None,
            tooltip_truncated: false,
            original_len,
        };
    }

    TruncatedString {
        inline,
        tooltip: Some(prefix(s, limits.tooltip).to_string()),
        tooltip_truncated: original_len > limits.tooltip,
        original_len,
    }
}

/// First `max_chars` characters of `s`.
fn prefix(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}
