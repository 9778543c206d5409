use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_call_type_markers() {
    assert_eq!(CallType::from_marker("->"), CallType::Instance);
    assert_eq!(CallType::from_marker(" :: "), CallType::Static);
    assert_eq!(CallType::from_marker(""), CallType::None);
    assert_eq!(CallType::from_marker("??"), CallType::None);
    assert_eq!(CallType::Instance.to_string(), "->");
    assert_eq!(CallType::None.as_str(), "");
}

#[test]
fn test_frame_builder() {
    let frame = StackFrame::new("bar")
        .at("/srv/app/Foo.src", 10)
        .in_class("App.Foo", CallType::Instance)
        .with_args(vec!["x".into()]);

    assert_eq!(frame.function.as_deref(), Some("bar"));
    assert_eq!(frame.file.as_deref(), Some("/srv/app/Foo.src"));
    assert_eq!(frame.line, Some(10));
    assert_eq!(frame.class.as_deref(), Some("App.Foo"));
    assert_eq!(frame.call_type, CallType::Instance);
    assert_eq!(frame.args.len(), 1);
}

#[test]
fn test_call_stack_preserves_order() {
    let stack: CallStack = ["a", "b", "c"].into_iter().map(StackFrame::new).collect();
    let names: Vec<_> = stack.iter().filter_map(|f| f.function.clone()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    assert_eq!(stack.len(), 3);
    assert!(CallStack::default().is_empty());
}
