//! Property-based tests for trace formatting.
//!
//! Generated call stacks are checked for:
//! 1. Frame preservation: N frames in, N units out, in capture order
//! 2. Truncation bounds for arbitrary strings and limits
//! 3. Determinism: the same input always renders the same output
//! 4. Bounded output for arbitrarily deep arrays

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::doc_markdown,
    clippy::uninlined_format_args,
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use proptest::prelude::*;
use trace_fmt::{
    format_trace, truncate, ConsoleScriptRenderer, FormattingConfig, HtmlTableRenderer,
    StringLimits,
};
use trace_ir::{CallStack, CallType, RuntimeValue, StackFrame};

// -- Strategies --

fn name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z_][a-z0-9_]{0,12}").expect("valid regex")
}

fn scalar_strategy() -> impl Strategy<Value = RuntimeValue> {
    prop_oneof![
        any::<String>().prop_map(RuntimeValue::Str),
        any::<i64>().prop_map(RuntimeValue::int),
        any::<f64>().prop_map(RuntimeValue::float),
        any::<bool>().prop_map(RuntimeValue::from),
        Just(RuntimeValue::Null),
        name_strategy().prop_map(RuntimeValue::object),
        (0u64..100).prop_map(RuntimeValue::ClosedResource),
    ]
}

fn value_strategy() -> impl Strategy<Value = RuntimeValue> {
    scalar_strategy().prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(RuntimeValue::list),
            prop::collection::vec((name_strategy(), inner), 0..6).prop_map(RuntimeValue::map),
        ]
    })
}

fn frame_strategy() -> impl Strategy<Value = StackFrame> {
    (
        name_strategy(),
        prop::option::of(("/[a-z/]{0,20}\\.src", 0u32..500)),
        prop::option::of(name_strategy()),
        prop::collection::vec(value_strategy(), 0..4),
    )
        .prop_map(|(function, location, class, args)| {
            let mut frame = StackFrame::new(function).with_args(args);
            if let Some((file, line)) = location {
                frame = frame.at(file, line);
            }
            if let Some(class) = class {
                frame = frame.in_class(class, CallType::Static);
            }
            frame
        })
}

fn stack_strategy() -> impl Strategy<Value = CallStack> {
    prop::collection::vec(frame_strategy(), 0..12).prop_map(CallStack::new)
}

/// Array nested `depth` levels deep.
fn nested_array(depth: usize) -> RuntimeValue {
    (0..depth).fold(RuntimeValue::int(0), |inner, _| RuntimeValue::list(vec![inner]))
}

// -- Property Tests --

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    /// One console unit per frame, numbered in capture order.
    #[test]
    fn prop_console_preserves_frames(stack in stack_strategy()) {
        let mut renderer = ConsoleScriptRenderer::default();
        let out = format_trace(&stack, &FormattingConfig::default(), &mut renderer);
        let lines: Vec<&str> = if out.is_empty() { vec![] } else { out.split('\n').collect() };

        prop_assert_eq!(lines.len(), stack.len());
        for (i, line) in lines.iter().enumerate() {
            let prefix = format!("console.log('#{} ", i);
            prop_assert!(line.starts_with(&prefix));
        }
    }

    /// One table row per frame.
    #[test]
    fn prop_html_preserves_frames(stack in stack_strategy()) {
        let out = format_trace(&stack, &FormattingConfig::default(), &mut HtmlTableRenderer::new());
        let rows = out.matches(r#"<tr><td class="trace_path">"#).count();
        prop_assert_eq!(rows, stack.len());
    }

    /// Inline and tooltip views never exceed their limits.
    #[test]
    fn prop_truncation_bounds(s in any::<String>(), inline in 1usize..50, extra in 0usize..100) {
        let limits = StringLimits { inline, tooltip: inline + extra };
        let t = truncate(&s, limits);
        let len = s.chars().count();

        prop_assert_eq!(t.original_len, len);
        prop_assert!(t.inline.chars().count() <= inline);
        prop_assert!(s.starts_with(&t.inline));
        prop_assert_eq!(t.tooltip.is_some(), len > inline);
        if let Some(tooltip) = &t.tooltip {
            prop_assert!(tooltip.chars().count() <= limits.tooltip);
            prop_assert!(s.starts_with(tooltip.as_str()));
            prop_assert_eq!(t.tooltip_truncated, len > limits.tooltip);
        }
    }

    /// Rendering the same stack twice gives identical output.
    #[test]
    fn prop_deterministic(stack in stack_strategy()) {
        let config = FormattingConfig::default();
        let first = format_trace(&stack, &config, &mut HtmlTableRenderer::new());
        let second = format_trace(&stack, &config, &mut HtmlTableRenderer::new());
        prop_assert_eq!(first, second);
    }

    /// Only `max_array_depth + 1` levels of nesting are expanded.
    #[test]
    fn prop_deep_arrays_bounded(depth in 1usize..300, max_depth in 0i64..6) {
        let frame = StackFrame::new("f").with_args(vec![nested_array(depth)]);
        let stack = CallStack::new(vec![frame]);
        let config = FormattingConfig {
            max_array_depth: max_depth,
            ..FormattingConfig::default()
        };
        let out = format_trace(&stack, &config, &mut HtmlTableRenderer::new());

        let expanded = out.matches("array[").count();
        let limit = usize::try_from(max_depth).unwrap() + 1;
        prop_assert_eq!(expanded, depth.min(limit));
        prop_assert_eq!(out.contains(r#"<span class="etc">...</span>"#), depth > limit);
    }
}
