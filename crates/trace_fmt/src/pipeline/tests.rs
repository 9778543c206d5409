use super::*;
use crate::signature::{FunctionSignature, SignatureRegistry};
use pretty_assertions::assert_eq;
use trace_ir::RuntimeValue;

/// Renderer that records every stage it sees.
#[derive(Default)]
struct Recorder {
    calls: Vec<String>,
    seen_config: Option<ResolvedConfig>,
    records: Vec<FrameRecord>,
}

impl Renderer for Recorder {
    fn before(&mut self, config: &FormattingConfig) -> ResolvedConfig {
        self.calls.push("before".into());
        let resolved = config.validated();
        self.seen_config = Some(resolved.clone());
        resolved
    }

    fn per_frame(&mut self, index: usize, _record: &FrameRecord) {
        self.calls.push(format!("frame {index}"));
    }

    fn completion(
        &mut self,
        _config: &ResolvedConfig,
        records: &[FrameRecord],
        summary: &TraceSummary,
    ) -> String {
        self.calls.push("completion".into());
        self.records = records.to_vec();
        format!("{}/{}", summary.frame_count, summary.max_args)
    }
}

fn stack() -> CallStack {
    CallStack::new(vec![
        StackFrame::new("bar")
            .at("/srv/app/Foo.src", 10)
            .in_class("App.Foo", CallType::Instance)
            .with_args(vec!["x".into()]),
        StackFrame::new("handle")
            .at("/srv/app/Kernel.src", 42)
            .with_args(vec![RuntimeValue::int(1), RuntimeValue::Null, true.into()]),
        StackFrame::default(),
    ])
}

#[test]
fn test_stage_order() {
    let mut recorder = Recorder::default();
    let out = format_trace(&stack(), &FormattingConfig::default(), &mut recorder);

    assert_eq!(out, "3/3");
    assert_eq!(
        recorder.calls,
        vec!["before", "frame 0", "frame 1", "frame 2", "completion"]
    );
}

#[test]
fn test_config_validated_before_use() {
    let mut recorder = Recorder::default();
    let config = FormattingConfig {
        max_array_depth: -1,
        ..FormattingConfig::default()
    };
    format_trace(&stack(), &config, &mut recorder);
    assert_eq!(recorder.seen_config.map(|c| c.max_array_depth), Some(0));
}

#[test]
fn test_records_preserve_order_and_fields() {
    let mut recorder = Recorder::default();
    format_trace(&stack(), &FormattingConfig::default(), &mut recorder);

    let records = &recorder.records;
    let names: Vec<_> = records.iter().map(|r| r.function.as_str()).collect();
    assert_eq!(names, vec!["bar", "handle", ""]);

    let first = &records[0];
    assert_eq!(first.file, "/srv/app/Foo.src");
    assert_eq!(first.line, 10);
    assert_eq!(first.class, "App.Foo");
    assert_eq!(first.call_type, CallType::Instance);
}

#[test]
fn test_malformed_frame_defaults() {
    let mut recorder = Recorder::default();
    format_trace(&stack(), &FormattingConfig::default(), &mut recorder);

    let last = &recorder.records[2];
    assert_eq!(last.file, "");
    assert_eq!(last.line, 0);
    assert_eq!(last.class, "");
    assert_eq!(last.call_type, CallType::None);
    assert_eq!(last.function, "");
    assert_eq!(last.args, Some(vec![]));
    assert!(last.signature.is_empty());
}

#[test]
fn test_skip_argument_detail() {
    let mut recorder = Recorder::default();
    let config = FormattingConfig {
        skip_argument_detail: true,
        ..FormattingConfig::default()
    };
    let out = format_trace(&stack(), &config, &mut recorder);

    assert_eq!(out, "3/0");
    assert!(recorder.records.iter().all(|r| r.args.is_none()));
}

#[test]
fn test_signature_and_class_doc_resolved() {
    let mut reg = SignatureRegistry::new();
    reg.register_method(
        "App.Foo",
        "bar",
        FunctionSignature {
            params: 3,
            required: 3,
            doc: Some("/** Does bar. */".into()),
        },
    );
    reg.register_class_doc("App.Foo", "/** The foo. */");

    let mut recorder = Recorder::default();
    TracePipeline::new(&reg).format(&stack(), &FormattingConfig::default(), &mut recorder);

    let first = &recorder.records[0];
    assert_eq!(first.signature.param_summary, "3.3 unset 2");
    assert_eq!(first.signature.deficit, Some(2));
    assert_eq!(
        first.class_doc.as_ref().map(ToString::to_string).as_deref(),
        Some("The foo.")
    );
    // Other frames unaffected
    assert!(recorder.records[1].signature.is_empty());
}

struct FlakyIntrospector;

impl Introspector for FlakyIntrospector {
    fn function_signature(&self, function: &str, _: Option<&str>) -> Option<FunctionSignature> {
        if function == "bar" {
            panic!("reflection failed");
        }
        Some(FunctionSignature {
            params: 1,
            required: 1,
            doc: None,
        })
    }
}

#[test]
fn test_signature_failure_isolated_to_frame() {
    let mut recorder = Recorder::default();
    let pipeline = TracePipeline::new(&FlakyIntrospector);
    pipeline.format(&stack(), &FormattingConfig::default(), &mut recorder);
    assert!(recorder.records[0].signature.is_empty());
    assert_eq!(recorder.records[1].signature.param_summary, "1.1");
}

#[test]
fn test_global_scope_elided_in_arguments() {
    let globals = trace_ir::ArrayValue::new(vec![]);
    let arg = RuntimeValue::Array(Arc::clone(&globals));
    let stack = CallStack::new(vec![StackFrame::new("f").with_args(vec![arg])]);

    let mut recorder = Recorder::default();
    TracePipeline::default()
        .with_global_scope(globals)
        .format(&stack, &FormattingConfig::default(), &mut recorder);

    assert_eq!(recorder.records[0].args, Some(vec![ArgNode::Elided]));
}
