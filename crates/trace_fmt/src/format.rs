//! Recursive argument formatting.
//!
//! [`ArgumentFormatter`] turns captured values into [`ArgNode`] trees that
//! renderers compose into their own dialect. It owns no state between calls:
//! the current array depth is a parameter of every recursive step.
//!
//! # Depth
//!
//! A top-level argument is at depth 0. An array at depth `d` is expanded when
//! `d <= max_array_depth`; its entries are formatted at `d + 1`. Deeper arrays
//! become [`ArgNode::Elided`] without their entries being visited, so a
//! self-referential capture terminates after `max_array_depth + 1` levels.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use trace_ir::{
    classify, split_qualified, ArrayValue, CallableValue, ObjectValue, ResourceValue, RuntimeValue,
    ValueKind,
};
use trace_stack::ensure_sufficient_stack;

use crate::config::StringLimits;
use crate::doc::DocComment;
use crate::signature::{guarded, Introspector};
use crate::truncate::{truncate, TruncatedString};

/// Formatted argument, independent of output dialect.
#[derive(Clone, Debug, PartialEq)]
pub enum ArgNode {
    Str(TruncatedString),
    Numeric(String),
    Bool(bool),
    Null,
    /// Expanded array: entry count badge plus one row per entry.
    Array {
        len: usize,
        rows: Vec<ArgRow>,
    },
    /// Content omitted because of the depth bound or the global scope.
    Elided,
    Callable {
        name: String,
        /// `code` / `this` / `file name` rows, when the source was resolved.
        detail: Option<Vec<ArgRow>>,
    },
    Object {
        /// Namespace prefix including the trailing separator.
        namespace: String,
        short_name: String,
        doc: Option<DocComment>,
    },
    Resource {
        label: String,
        metadata: Vec<ArgRow>,
    },
    ClosedResource {
        label: String,
    },
    Other {
        type_name: String,
    },
}

/// One key/value row of an expanded container.
#[derive(Clone, Debug, PartialEq)]
pub struct ArgRow {
    pub key: String,
    pub value: ArgNode,
}

/// Formats captured values under one configuration.
pub struct ArgumentFormatter<'a> {
    max_array_depth: usize,
    limits: StringLimits,
    introspector: &'a dyn Introspector,
    global_scope: Option<&'a Arc<ArrayValue>>,
}

impl<'a> ArgumentFormatter<'a> {
    pub fn new(
        max_array_depth: usize,
        limits: StringLimits,
        introspector: &'a dyn Introspector,
    ) -> Self {
        ArgumentFormatter {
            max_array_depth,
            limits,
            introspector,
            global_scope: None,
        }
    }

    /// Container that always renders as [`ArgNode::Elided`].
    #[must_use]
    pub fn with_global_scope(mut self, scope: Option<&'a Arc<ArrayValue>>) -> Self {
        self.global_scope = scope;
        self
    }

    /// Format a top-level argument.
    pub fn format_argument(&self, value: &RuntimeValue) -> ArgNode {
        self.format_element(value, 0)
    }

    /// Format one argument or container row. A panic below degrades only this
    /// element to [`ArgNode::Other`]; its siblings keep their formatting.
    fn format_element(&self, value: &RuntimeValue, depth: usize) -> ArgNode {
        isolate(value, || self.format_value(value, depth))
    }

    /// Format a value at the given array depth.
    pub fn format_value(&self, value: &RuntimeValue, depth: usize) -> ArgNode {
        match classify(value) {
            ValueKind::String(s) => ArgNode::Str(truncate(s, self.limits)),
            ValueKind::Numeric(n) => ArgNode::Numeric(n.to_string()),
            ValueKind::Boolean(b) => ArgNode::Bool(b),
            ValueKind::Null => ArgNode::Null,
            ValueKind::Array(arr) => self.format_array(arr, depth),
            ValueKind::Callable(c) => self.format_callable(c, depth),
            ValueKind::Object(o) => self.format_object(o),
            ValueKind::Resource(r) => self.format_resource(r, depth),
            ValueKind::ClosedResource(id) => ArgNode::ClosedResource {
                label: format!("closed resource #{id}"),
            },
            ValueKind::Other(type_name) => ArgNode::Other {
                type_name: type_name.into_owned(),
            },
        }
    }

    fn format_array(&self, arr: &Arc<ArrayValue>, depth: usize) -> ArgNode {
        if self.global_scope.is_some_and(|g| Arc::ptr_eq(g, arr)) {
            return ArgNode::Elided;
        }
        if depth > self.max_array_depth {
            tracing::trace!(depth, "array depth limit reached");
            return ArgNode::Elided;
        }

        ensure_sufficient_stack(|| ArgNode::Array {
            len: arr.len(),
            rows: arr
                .entries()
                .iter()
                .map(|(key, value)| ArgRow {
                    key: key.to_string(),
                    value: self.format_element(value, depth + 1),
                })
                .collect(),
        })
    }

    /// Rows of a synthetic detail table, formatted at the current depth.
    fn detail_rows(&self, entries: Vec<(String, RuntimeValue)>, depth: usize) -> Vec<ArgRow> {
        entries
            .into_iter()
            .map(|(key, value)| ArgRow {
                value: self.format_element(&value, depth),
                key,
            })
            .collect()
    }

    fn format_callable(&self, callable: &CallableValue, depth: usize) -> ArgNode {
        let name = callable.name.clone();
        let Some(location) = &callable.location else {
            return ArgNode::Callable { name, detail: None };
        };

        let excerpt = || self.introspector.source_excerpt(location);
        let lines = guarded("source_excerpt", excerpt).flatten();
        let code = lines.map_or(RuntimeValue::Null, |lines| {
            let first = i64::from(location.start_line);
            let numbered = (first..).zip(lines.into_iter().map(RuntimeValue::Str));
            RuntimeValue::map(numbered.collect())
        });
        let this = callable.bound_this.clone().unwrap_or(RuntimeValue::Null);
        let file = RuntimeValue::Str(location.file.clone());

        let entries = vec![
            ("code".to_string(), code),
            ("this".to_string(), this),
            ("file name".to_string(), file),
        ];

        ArgNode::Callable {
            name,
            detail: Some(self.detail_rows(entries, depth)),
        }
    }

    fn format_object(&self, object: &ObjectValue) -> ArgNode {
        let (namespace, short_name) = split_qualified(&object.class);
        let doc = guarded("class_doc", || self.introspector.class_doc(&object.class))
            .flatten()
            .map(|raw| DocComment::parse(&raw))
            .filter(|doc| !doc.is_empty());

        ArgNode::Object {
            namespace: namespace.to_string(),
            short_name: short_name.to_string(),
            doc,
        }
    }

    fn format_resource(&self, resource: &ResourceValue, depth: usize) -> ArgNode {
        let mut entries = Vec::with_capacity(resource.metadata.len() + 1);
        if !resource.kind.is_empty() {
            entries.push(("type".to_string(), RuntimeValue::string(&resource.kind)));
        }
        entries.extend(resource.metadata.iter().cloned());

        ArgNode::Resource {
            label: format!("resource#{}", resource.id),
            metadata: self.detail_rows(entries, depth),
        }
    }
}

/// Run `format` for `value`, turning a panic into an [`ArgNode::Other`]
/// placeholder for that value alone.
fn isolate(value: &RuntimeValue, format: impl FnOnce() -> ArgNode) -> ArgNode {
    catch_unwind(AssertUnwindSafe(format)).unwrap_or_else(|_| {
        tracing::warn!(type_name = value.type_name(), "formatting panicked");
        ArgNode::Other {
            type_name: value.type_name().to_string(),
        }
    })
}
