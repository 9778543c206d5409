//! Value classification.
//!
//! [`classify`] is total and pure: every [`RuntimeValue`] maps to exactly one
//! [`ValueKind`]. Snapshots that are structurally present but unusable for
//! display (an object without a class name, an unnamed callable) map to
//! [`ValueKind::Other`] rather than producing a malformed fragment later.

use std::borrow::Cow;
use std::sync::Arc;

use crate::value::{ArrayValue, CallableValue, Numeric, ObjectValue, ResourceValue, RuntimeValue};

/// Display variant of a captured value.
#[derive(Clone, Debug)]
pub enum ValueKind<'a> {
    String(&'a str),
    Numeric(Numeric),
    Boolean(bool),
    Null,
    Array(&'a Arc<ArrayValue>),
    Callable(&'a CallableValue),
    Object(&'a ObjectValue),
    Resource(&'a ResourceValue),
    ClosedResource(u64),
    /// Fallback; carries the type name to display.
    Other(Cow<'a, str>),
}

/// Classify a captured value.
pub fn classify(value: &RuntimeValue) -> ValueKind<'_> {
    match value {
        RuntimeValue::Str(s) => ValueKind::String(s),
        RuntimeValue::Numeric(n) => ValueKind::Numeric(*n),
        RuntimeValue::Bool(b) => ValueKind::Boolean(*b),
        RuntimeValue::Null => ValueKind::Null,
        RuntimeValue::Array(arr) => ValueKind::Array(arr),
        RuntimeValue::Callable(c) if c.name.trim().is_empty() => {
            ValueKind::Other(Cow::Borrowed("callable"))
        }
        RuntimeValue::Callable(c) => ValueKind::Callable(c),
        RuntimeValue::Object(o) if o.class.trim().is_empty() => {
            ValueKind::Other(Cow::Borrowed("object"))
        }
        RuntimeValue::Object(o) => ValueKind::Object(o),
        RuntimeValue::Resource(r) => ValueKind::Resource(r),
        RuntimeValue::ClosedResource(id) => ValueKind::ClosedResource(*id),
        RuntimeValue::Other(name) if name.trim().is_empty() => {
            ValueKind::Other(Cow::Borrowed("unknown type"))
        }
        RuntimeValue::Other(name) => ValueKind::Other(Cow::Borrowed(name)),
    }
}
