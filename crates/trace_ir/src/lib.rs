//! Captured call stacks and argument snapshots.
//!
//! Everything in this crate is a read-only snapshot taken once at the moment
//! an error is reported. Formatting crates consume these types by reference
//! and never mutate them.
//!
//! - [`RuntimeValue`]: a captured argument (closed set of variants)
//! - [`StackFrame`] / [`CallStack`]: the frames of one captured error
//! - [`classify`]: total mapping of a value onto its display variant
//! - [`split_qualified`]: namespace / short-name split for class paths

mod classify;
mod frame;
mod name;
mod value;

pub use classify::{classify, ValueKind};
pub use frame::{CallStack, CallType, StackFrame};
pub use name::{split_qualified, NAMESPACE_SEPARATORS};
pub use value::{
    ArrayKey, ArrayValue, CallableValue, Numeric, ObjectValue, ResourceValue, RuntimeValue,
    SourceRange,
};
