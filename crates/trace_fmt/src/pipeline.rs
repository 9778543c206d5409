//! The trace formatting pipeline.
//!
//! One run has three strictly ordered stages:
//!
//! 1. **before**: the renderer validates the raw configuration
//! 2. **per frame**: every frame is normalised into a [`FrameRecord`]
//!    (signature resolved, arguments formatted unless skipped) and handed to
//!    the renderer's per-frame hook
//! 3. **completion**: the renderer composes the final string from all
//!    records, in capture order
//!
//! Bookkeeping that spans frames (the widest argument list) lives in a
//! [`TraceSummary`] local to the run.

use std::sync::Arc;

use trace_ir::{ArrayValue, CallStack, CallType, StackFrame};

use crate::config::{FormattingConfig, ResolvedConfig};
use crate::doc::DocComment;
use crate::format::{ArgNode, ArgumentFormatter};
use crate::signature::{guarded, resolve_signature, Introspector, NoIntrospection, SignatureInfo};

/// A frame after normalisation. Missing fields are empty / zero.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRecord {
    pub file: String,
    /// `0` for internal calls.
    pub line: u32,
    pub class: String,
    pub call_type: CallType,
    pub function: String,
    pub signature: SignatureInfo,
    /// Documentation of `class`, if discoverable.
    pub class_doc: Option<DocComment>,
    /// `None` when argument detail was skipped.
    pub args: Option<Vec<ArgNode>>,
}

/// Cross-frame facts gathered during a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TraceSummary {
    pub frame_count: usize,
    /// Largest number of formatted arguments on any frame.
    pub max_args: usize,
}

/// Output dialect plugged into the pipeline.
pub trait Renderer {
    /// Validate and normalise the configuration for this run.
    fn before(&mut self, config: &FormattingConfig) -> ResolvedConfig {
        config.validated()
    }

    /// Observe one record as soon as it is produced.
    fn per_frame(&mut self, _index: usize, _record: &FrameRecord) {}

    /// Compose the final output.
    fn completion(
        &mut self,
        config: &ResolvedConfig,
        records: &[FrameRecord],
        summary: &TraceSummary,
    ) -> String;
}

/// Drives renderers over captured call stacks.
pub struct TracePipeline<'a> {
    introspector: &'a dyn Introspector,
    global_scope: Option<Arc<ArrayValue>>,
}

impl Default for TracePipeline<'_> {
    fn default() -> Self {
        TracePipeline::new(&NoIntrospection)
    }
}

impl<'a> TracePipeline<'a> {
    pub fn new(introspector: &'a dyn Introspector) -> Self {
        TracePipeline {
            introspector,
            global_scope: None,
        }
    }

    /// Captured global scope; any argument identical to it is elided.
    #[must_use]
    pub fn with_global_scope(mut self, scope: Arc<ArrayValue>) -> Self {
        self.global_scope = Some(scope);
        self
    }

    /// Format `stack` with `renderer`. Never fails.
    #[tracing::instrument(level = "debug", skip_all, fields(frames = stack.len()))]
    pub fn format(
        &self,
        stack: &CallStack,
        config: &FormattingConfig,
        renderer: &mut dyn Renderer,
    ) -> String {
        let config = renderer.before(config);

        let depth = config.max_array_depth;
        let formatter = ArgumentFormatter::new(depth, config.limits, self.introspector)
            .with_global_scope(self.global_scope.as_ref());

        let mut summary = TraceSummary::default();
        let mut records = Vec::with_capacity(stack.len());

        for (index, frame) in stack.iter().enumerate() {
            let record = self.normalize(frame, &config, &formatter);
            if let Some(args) = &record.args {
                summary.max_args = summary.max_args.max(args.len());
            }
            renderer.per_frame(index, &record);
            records.push(record);
        }
        summary.frame_count = records.len();

        tracing::debug!(
            frames = summary.frame_count,
            max_args = summary.max_args,
            "trace normalised"
        );
        renderer.completion(&config, &records, &summary)
    }

    fn normalize(
        &self,
        frame: &StackFrame,
        config: &ResolvedConfig,
        formatter: &ArgumentFormatter<'_>,
    ) -> FrameRecord {
        let class = frame.class.clone().unwrap_or_default();
        let function = frame.function.clone().unwrap_or_default();

        let signature = resolve_signature(
            self.introspector,
            &function,
            Some(class.as_str()),
            frame.args.len(),
        );

        let class_doc = if class.is_empty() {
            None
        } else {
            guarded("class_doc", || self.introspector.class_doc(&class))
                .flatten()
                .map(|raw| DocComment::parse(&raw))
                .filter(|doc| !doc.is_empty())
        };

        let args = if config.skip_argument_detail {
            None
        } else {
            let formatted = frame.args.iter().map(|arg| formatter.format_argument(arg));
            Some(formatted.collect())
        };

        FrameRecord {
            file: frame.file.clone().unwrap_or_default(),
            line: frame.line.unwrap_or(0),
            call_type: if class.is_empty() {
                CallType::None
            } else {
                frame.call_type
            },
            class,
            function,
            signature,
            class_doc,
            args,
        }
    }
}

/// Format `stack` without introspection.
pub fn format_trace(
    stack: &CallStack,
    config: &FormattingConfig,
    renderer: &mut dyn Renderer,
) -> String {
    TracePipeline::default().format(stack, config, renderer)
}

#[cfg(test)]
mod tests;
