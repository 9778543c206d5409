use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_split_dotted() {
    assert_eq!(split_qualified("App.Foo"), ("App.", "Foo"));
    assert_eq!(split_qualified("a.b.C"), ("a.b.", "C"));
}

#[test]
fn test_split_other_separators() {
    assert_eq!(
        split_qualified("app::http::Request"),
        ("app::http::", "Request")
    );
    assert_eq!(
        split_qualified("Illuminate\\Http\\Kernel"),
        ("Illuminate\\Http\\", "Kernel")
    );
}

#[test]
fn test_split_unqualified() {
    assert_eq!(split_qualified("Foo"), ("", "Foo"));
    assert_eq!(split_qualified(""), ("", ""));
}

#[test]
fn test_split_trailing_separator() {
    assert_eq!(split_qualified("App."), ("App.", ""));
}
