//! Rendering a decoded capture with the configured dialect.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use trace_fmt::{ConsoleScriptRenderer, HtmlTableRenderer, TracePipeline, UnknownSeverity};

use crate::capture::Capture;
use crate::settings::{RendererSettings, Settings};

/// Output dialect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dialect {
    Html,
    Console,
}

impl Dialect {
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Html => "html",
            Dialect::Console => "console",
        }
    }

    /// The settings section this dialect reads.
    pub fn section(self, settings: &Settings) -> &RendererSettings {
        match self {
            Dialect::Html => &settings.html,
            Dialect::Console => &settings.console,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown dialect name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown output `{0}` (expected `html` or `console`)")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "html" => Ok(Dialect::Html),
            "console" => Ok(Dialect::Console),
            other => Err(UnknownDialect(other.to_string())),
        }
    }
}

/// Render `capture`, or `None` when the dialect is disabled or does not
/// handle the capture's severity.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(dialect = %dialect, severity = %capture.severity)
)]
pub fn render_capture(
    capture: &Capture,
    settings: &Settings,
    dialect: Dialect,
) -> Result<Option<String>, UnknownSeverity> {
    let section = dialect.section(settings);
    if !section.enabled {
        tracing::debug!("dialect disabled");
        return Ok(None);
    }
    if !section.severity_mask()?.allows(capture.severity) {
        tracing::debug!("severity not handled");
        return Ok(None);
    }

    let mut pipeline = TracePipeline::new(&capture.registry);
    if let Some(globals) = &capture.globals {
        pipeline = pipeline.with_global_scope(Arc::clone(globals));
    }

    let out = match dialect {
        Dialect::Html => pipeline.format(
            &capture.stack,
            &section.formatting,
            &mut HtmlTableRenderer::new(),
        ),
        Dialect::Console => pipeline.format(
            &capture.stack,
            &section.formatting,
            &mut ConsoleScriptRenderer::new(section.console_method()),
        ),
    };
    Ok(Some(out))
}
