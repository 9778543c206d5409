//! Call-stack formatting.
//!
//! Turns a captured [`CallStack`](trace_ir::CallStack) into a human-readable
//! trace: an HTML table for the browser or a series of console statements.
//!
//! # Architecture
//!
//! - [`config`]: raw knobs and their validated form
//! - [`format`]: recursive, depth-bounded argument formatting
//! - [`pipeline`]: per-frame normalisation and the [`Renderer`] stages
//! - [`render`]: the HTML and console dialects
//! - [`signature`]: optional introspection of callees
//! - [`gate`]: severity filter applied before formatting
//!
//! Formatting never fails. Malformed frames get empty fields, values that
//! cannot be inspected degrade to a type-name placeholder, and failing
//! introspection is treated as absent.

pub mod config;
pub mod doc;
pub mod format;
pub mod gate;
pub mod pipeline;
pub mod render;
pub mod signature;
pub mod truncate;

pub use config::{FormattingConfig, ResolvedConfig, StringLimits};
pub use doc::{DocComment, DocLine, DocSpan, DocTag};
pub use format::{ArgNode, ArgRow, ArgumentFormatter};
pub use gate::{Severity, SeverityMask, UnknownSeverity};
pub use pipeline::{format_trace, FrameRecord, Renderer, TracePipeline, TraceSummary};
pub use render::{console_statement, ConsoleMethod, ConsoleScriptRenderer, HtmlTableRenderer};
pub use signature::{
    resolve_signature, FunctionSignature, Introspector, NoIntrospection, SignatureInfo,
    SignatureRegistry,
};
pub use truncate::{truncate, TruncatedString};
