//! Qualified-name handling.

/// Path separators recognised in class names, longest first.
pub const NAMESPACE_SEPARATORS: [&str; 3] = ["::", "\\", "."];

/// Split a qualified class name into its namespace prefix (separator
/// included) and its short name.
///
/// `"App.Foo"` splits into `("App.", "Foo")`, `"Foo"` into `("", "Foo")`.
pub fn split_qualified(name: &str) -> (&str, &str) {
    let split_at = NAMESPACE_SEPARATORS
        .iter()
        .filter_map(|sep| name.rfind(sep).map(|pos| pos + sep.len()))
        .max();

    match split_at {
        Some(at) => name.split_at(at),
        None => ("", name),
    }
}

#[cfg(test)]
mod tests;
