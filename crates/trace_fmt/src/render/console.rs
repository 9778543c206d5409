//! Browser console renderer.
//!
//! Every frame becomes one `console.<method>('...');` statement carrying a
//! single-line unit:
//!
//! ```text
//! #0 /Foo.src ( 10 ) App.Foo -> bar[3.3 unset 2]
//! #1 [internal function]: array_map
//! ```
//!
//! Argument detail is never shown, so the renderer switches it off before
//! the pipeline formats anything.

use std::fmt::{self, Write};

use crate::config::{FormattingConfig, ResolvedConfig};
use crate::pipeline::{FrameRecord, Renderer, TraceSummary};

use super::{escape_script, relativize};

/// Console method a statement is sent to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConsoleMethod {
    #[default]
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

impl ConsoleMethod {
    /// Parse a configured method name. Anything unrecognised is `Log`.
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim() {
            "info" => ConsoleMethod::Info,
            "warn" => ConsoleMethod::Warn,
            "error" => ConsoleMethod::Error,
            "debug" => ConsoleMethod::Debug,
            other => {
                if other != "log" {
                    tracing::debug!(method = other, "unknown console method, using log");
                }
                ConsoleMethod::Log
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConsoleMethod::Log => "log",
            ConsoleMethod::Info => "info",
            ConsoleMethod::Warn => "warn",
            ConsoleMethod::Error => "error",
            ConsoleMethod::Debug => "debug",
        }
    }
}

impl fmt::Display for ConsoleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wrap `message` in a console call. The message is escaped for a
/// single-quoted string literal.
pub fn console_statement(method: ConsoleMethod, message: &str) -> String {
    format!("console.{method}('{}');", escape_script(message))
}

/// Renders a trace as console statements, one per frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleScriptRenderer {
    method: ConsoleMethod,
}

impl ConsoleScriptRenderer {
    pub fn new(method: ConsoleMethod) -> Self {
        ConsoleScriptRenderer { method }
    }
}

impl Renderer for ConsoleScriptRenderer {
    fn before(&mut self, config: &FormattingConfig) -> ResolvedConfig {
        let mut resolved = config.validated();
        resolved.skip_argument_detail = true;
        resolved
    }

    fn completion(
        &mut self,
        config: &ResolvedConfig,
        records: &[FrameRecord],
        _summary: &TraceSummary,
    ) -> String {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let unit = frame_unit(index, record, &config.app_root_path);
                console_statement(self.method, &unit)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Plain-text line for one frame.
fn frame_unit(index: usize, record: &FrameRecord, app_root: &str) -> String {
    let file = record.file.replace('\\', "/");
    let mut unit = format!("#{index} {}", relativize(&file, app_root));

    if record.line == 0 {
        unit.push_str("[internal function]: ");
    } else {
        let _ = write!(unit, " ( {} ) ", record.line);
    }

    if !record.class.is_empty() {
        unit.push_str(&record.class);
        unit.push(' ');
        let call_type = record.call_type.as_str();
        if !call_type.is_empty() {
            unit.push_str(call_type);
            unit.push(' ');
        }
    }

    unit.push_str(&record.function);
    if !record.signature.param_summary.is_empty() {
        let _ = write!(unit, "[{}]", record.signature.param_summary);
    }
    unit
}
