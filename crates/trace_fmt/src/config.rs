//! Formatting configuration.
//!
//! Raw values come from an outside configuration layer and are stored as
//! signed integers so that out-of-range input survives deserialization and
//! can be clamped here. [`FormattingConfig::validated`] never fails.

use serde::Deserialize;

/// Default nesting depth for expanded arrays.
pub const DEFAULT_MAX_ARRAY_DEPTH: u16 = 2;
/// Default number of characters shown inline for string arguments.
pub const DEFAULT_MAX_INLINE_STRING_LENGTH: u16 = 80;
/// Default number of characters shown in the expanded string view.
pub const DEFAULT_MAX_TOOLTIP_STRING_LENGTH: u16 = 1000;

/// Formatting knobs as supplied by the configuration layer.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormattingConfig {
    pub max_array_depth: i64,
    pub max_inline_string_length: i64,
    pub max_tooltip_string_length: i64,
    /// Skip argument formatting entirely.
    pub skip_argument_detail: bool,
    /// Prefix stripped from file paths.
    pub app_root_path: String,
    /// Vendor path prefix to highlight in path cells (HTML only).
    pub highlight_prefix: Option<String>,
    /// Root namespace to highlight in namespace cells (HTML only).
    pub highlight_namespace: Option<String>,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        FormattingConfig {
            max_array_depth: i64::from(DEFAULT_MAX_ARRAY_DEPTH),
            max_inline_string_length: i64::from(DEFAULT_MAX_INLINE_STRING_LENGTH),
            max_tooltip_string_length: i64::from(DEFAULT_MAX_TOOLTIP_STRING_LENGTH),
            skip_argument_detail: false,
            app_root_path: String::new(),
            highlight_prefix: None,
            highlight_namespace: None,
        }
    }
}

/// Validated configuration with every invariant established.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub max_array_depth: usize,
    pub limits: StringLimits,
    pub skip_argument_detail: bool,
    /// Root path with back-slashes normalised and no trailing separator.
    pub app_root_path: String,
    pub highlight_prefix: Option<String>,
    pub highlight_namespace: Option<String>,
}

/// String truncation limits. `inline > 0` and `tooltip >= inline`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StringLimits {
    pub inline: usize,
    pub tooltip: usize,
}

impl Default for StringLimits {
    fn default() -> Self {
        StringLimits {
            inline: usize::from(DEFAULT_MAX_INLINE_STRING_LENGTH),
            tooltip: usize::from(DEFAULT_MAX_TOOLTIP_STRING_LENGTH),
        }
    }
}

impl FormattingConfig {
    /// Clamp and default every field.
    ///
    /// - negative depth becomes `0`
    /// - non-positive lengths fall back to their defaults
    /// - a tooltip limit below the inline limit is raised to it
    pub fn validated(&self) -> ResolvedConfig {
        let max_array_depth = usize::try_from(self.max_array_depth).unwrap_or_else(|_| {
            tracing::debug!(value = self.max_array_depth, "negative depth clamped");
            0
        });

        let inline = positive_or(
            self.max_inline_string_length,
            DEFAULT_MAX_INLINE_STRING_LENGTH,
            "max_inline_string_length",
        );
        let tooltip = positive_or(
            self.max_tooltip_string_length,
            DEFAULT_MAX_TOOLTIP_STRING_LENGTH,
            "max_tooltip_string_length",
        )
        .max(inline);

        ResolvedConfig {
            max_array_depth,
            limits: StringLimits { inline, tooltip },
            skip_argument_detail: self.skip_argument_detail,
            app_root_path: normalize_root(&self.app_root_path),
            highlight_prefix: non_empty(self.highlight_prefix.as_deref()),
            highlight_namespace: non_empty(self.highlight_namespace.as_deref()),
        }
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        FormattingConfig::default().validated()
    }
}

fn positive_or(value: i64, default: u16, field: &'static str) -> usize {
    match usize::try_from(value) {
        Ok(n) if n > 0 => n,
        _ => {
            tracing::debug!(field, value, default, "non-positive length defaulted");
            usize::from(default)
        }
    }
}

fn normalize_root(root: &str) -> String {
    root.replace('\\', "/").trim_end_matches('/').to_string()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
