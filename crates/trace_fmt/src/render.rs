//! Output dialects.
//!
//! - HTML: a table with one row per frame and expandable detail blocks
//! - Console: one `console.<method>(...)` statement per frame
//!
//! Both implement [`Renderer`](crate::pipeline::Renderer).

mod console;
mod html;

pub use console::{console_statement, ConsoleMethod, ConsoleScriptRenderer};
pub use html::HtmlTableRenderer;

/// Escape text for HTML element content and attribute values.
pub(crate) fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            c => result.push(c),
        }
    }
    result
}

/// Escape text for a single-quoted script string literal.
///
/// The result contains no raw line breaks and cannot close a `<script>`
/// element.
pub(crate) fn escape_script(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => result.push_str("\\\\"),
            '\'' => result.push_str("\\'"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\u{2028}' => result.push_str("\\u2028"),
            '\u{2029}' => result.push_str("\\u2029"),
            '<' if chars.peek() == Some(&'/') => result.push_str("<\\"),
            c => result.push(c),
        }
    }
    result
}

/// Strip `root` from the start of `path`, on a path-segment boundary.
pub(crate) fn relativize<'p>(path: &'p str, root: &str) -> &'p str {
    if root.is_empty() {
        return path;
    }
    match path.strip_prefix(root) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => path,
    }
}
