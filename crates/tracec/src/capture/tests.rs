use super::*;
use pretty_assertions::assert_eq;
use trace_fmt::Introspector;

fn decode(text: &str) -> Capture {
    match Capture::from_json(text) {
        Ok(capture) => capture,
        Err(e) => panic!("capture should decode: {e}"),
    }
}

#[test]
fn test_frames_and_scalars() {
    let capture = decode(
        r#"{
            "severity": "warning",
            "frames": [
                {"file": "/srv/app/Foo.src", "line": 10, "class": "App.Foo", "type": "->",
                 "function": "bar",
                 "args": [
                    {"type": "string", "value": "x"},
                    {"type": "int", "value": 3},
                    {"type": "float", "value": 1.5},
                    {"type": "bool", "value": true},
                    {"type": "null"}
                 ]},
                {"function": "array_map"}
            ]
        }"#,
    );

    assert_eq!(capture.severity, Severity::Warning);
    assert_eq!(capture.stack.len(), 2);

    let first = &capture.stack.frames()[0];
    assert_eq!(first.file.as_deref(), Some("/srv/app/Foo.src"));
    assert_eq!(first.line, Some(10));
    assert_eq!(first.call_type, CallType::Instance);
    let types: Vec<_> = first.args.iter().map(RuntimeValue::type_name).collect();
    assert_eq!(types, vec!["string", "int", "float", "bool", "null"]);

    let second = &capture.stack.frames()[1];
    assert_eq!(second.file, None);
    assert_eq!(second.call_type, CallType::None);
    assert!(second.args.is_empty());
}

#[test]
fn test_default_severity() {
    assert_eq!(decode("{}").severity, Severity::Error);
}

#[test]
fn test_unknown_severity() {
    assert!(matches!(
        Capture::from_json(r#"{"severity": "fatal"}"#),
        Err(CaptureError::Severity(_))
    ));
}

#[test]
fn test_array_keys_and_order() {
    let capture = decode(
        r#"{"frames": [{"function": "f", "args": [
            {"type": "array", "value": {"entries": [
                ["b", {"type": "int", "value": 1}],
                [7, {"type": "int", "value": 2}]
            ]}}
        ]}]}"#,
    );
    let RuntimeValue::Array(arr) = &capture.stack.frames()[0].args[0] else {
        panic!("expected array");
    };
    let keys: Vec<String> = arr.entries().iter().map(|(k, _)| k.to_string()).collect();
    assert_eq!(keys, vec!["b", "7"]);
}

#[test]
fn test_self_reference() {
    let capture = decode(
        r#"{"frames": [{"function": "f", "args": [
            {"type": "array", "value": {"id": 1, "entries": [
                ["self", {"type": "ref", "value": 1}]
            ]}}
        ]}]}"#,
    );
    let RuntimeValue::Array(outer) = &capture.stack.frames()[0].args[0] else {
        panic!("expected array");
    };
    let RuntimeValue::Array(inner) = &outer.entries()[0].1 else {
        panic!("expected array entry");
    };
    assert!(Arc::ptr_eq(outer, inner));
}

#[test]
fn test_globals_shared_with_arguments() {
    let capture = decode(
        r#"{
            "globals": {"type": "array", "value": {"id": 9, "entries": []}},
            "frames": [{"function": "f", "args": [{"type": "ref", "value": 9}]}]
        }"#,
    );
    let Some(globals) = &capture.globals else {
        panic!("expected globals");
    };
    let RuntimeValue::Array(arg) = &capture.stack.frames()[0].args[0] else {
        panic!("expected array");
    };
    assert!(Arc::ptr_eq(globals, arg));
}

#[test]
fn test_unknown_ref() {
    let err = Capture::from_json(
        r#"{"frames": [{"function": "f", "args": [{"type": "ref", "value": 4}]}]}"#,
    );
    assert!(matches!(err, Err(CaptureError::UnknownRef(4))));
}

#[test]
fn test_duplicate_id() {
    let err = Capture::from_json(
        r#"{"frames": [{"function": "f", "args": [
            {"type": "array", "value": {"id": 2}},
            {"type": "array", "value": {"id": 2}}
        ]}]}"#,
    );
    assert!(matches!(err, Err(CaptureError::DuplicateId(2))));
}

#[test]
fn test_callable_resource_and_other() {
    let capture = decode(
        r#"{"frames": [{"function": "f", "args": [
            {"type": "callable", "value": {"name": "{closure}", "file": "/a.src",
             "start_line": 3, "this": {"type": "object", "value": "App.Foo"}}},
            {"type": "resource", "value": {"id": 5, "kind": "stream",
             "metadata": [["mode", {"type": "string", "value": "r"}]]}},
            {"type": "closed_resource", "value": 6},
            {"type": "other", "value": "fiber"}
        ]}]}"#,
    );
    let args = &capture.stack.frames()[0].args;

    let RuntimeValue::Callable(callable) = &args[0] else {
        panic!("expected callable");
    };
    assert_eq!(
        callable.location,
        Some(SourceRange {
            file: "/a.src".into(),
            start_line: 3,
            end_line: 3,
        })
    );
    assert_eq!(
        callable.bound_this.as_ref().map(RuntimeValue::type_name),
        Some("object")
    );

    let RuntimeValue::Resource(resource) = &args[1] else {
        panic!("expected resource");
    };
    assert_eq!((resource.id, resource.kind.as_str()), (5, "stream"));
    assert_eq!(resource.metadata.len(), 1);

    assert!(matches!(args[2], RuntimeValue::ClosedResource(6)));
    assert_eq!(args[3].type_name(), "fiber");
}

#[test]
fn test_registry_filled() {
    let capture = decode(
        r#"{
            "signatures": [
                {"class": "App.Foo", "function": "bar", "params": 2, "required": 1},
                {"function": "helper", "params": 0, "required": 0, "doc": "/** Helps. */"}
            ],
            "class_docs": [["App.Foo", "/** Foo. */"]],
            "sources": [["/a.src", "one\ntwo\nthree"]]
        }"#,
    );
    let registry = &capture.registry;

    assert_eq!(
        registry.function_signature("bar", Some("App.Foo")),
        Some(FunctionSignature {
            params: 2,
            required: 1,
            doc: None,
        })
    );
    assert!(registry.function_signature("bar", None).is_none());
    assert_eq!(
        registry
            .function_signature("helper", None)
            .and_then(|s| s.doc),
        Some("/** Helps. */".to_string())
    );
    assert_eq!(
        registry.class_doc("App.Foo").as_deref(),
        Some("/** Foo. */")
    );
    assert_eq!(
        registry.source_excerpt(&SourceRange {
            file: "/a.src".into(),
            start_line: 2,
            end_line: 3,
        }),
        Some(vec!["two".to_string(), "three".to_string()])
    );
}

#[test]
fn test_malformed_json() {
    assert!(matches!(
        Capture::from_json("{\"frames\": [}"),
        Err(CaptureError::Json(_))
    ));
}
