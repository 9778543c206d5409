//! Renderer settings loaded from TOML.
//!
//! ```toml
//! [html]
//! enabled = true
//! handle_trace = ["errors", "warnings"]
//! max_inline_string_length = 80
//! max_tooltip_string_length = 1000
//! max_array_depth = 2
//!
//! [console]
//! console = "warn"
//! app_root_path = "/srv/app"
//! ```
//!
//! Every key is optional. Formatting knobs are passed through unvalidated;
//! the renderer clamps them before use.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use trace_fmt::{ConsoleMethod, FormattingConfig, SeverityMask, UnknownSeverity};

/// Errors from loading settings.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("cannot read settings file `{path}`: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid `handle_trace` entry: {0}")]
    Severity(#[from] UnknownSeverity),
}

/// Settings for both output dialects.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub html: RendererSettings,
    pub console: RendererSettings,
}

/// Settings for one output dialect.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct RendererSettings {
    pub enabled: bool,
    /// Severity names or groups for which a trace is rendered.
    pub handle_trace: Vec<String>,
    /// Console method; only read by the console dialect.
    pub console: String,
    #[serde(flatten)]
    pub formatting: FormattingConfig,
}

impl Default for RendererSettings {
    fn default() -> Self {
        RendererSettings {
            enabled: true,
            handle_trace: vec!["all".to_string()],
            console: "log".to_string(),
            formatting: FormattingConfig::default(),
        }
    }
}

impl RendererSettings {
    pub fn severity_mask(&self) -> Result<SeverityMask, UnknownSeverity> {
        SeverityMask::from_names(&self.handle_trace)
    }

    pub fn console_method(&self) -> ConsoleMethod {
        ConsoleMethod::parse_lenient(&self.console)
    }
}

impl Settings {
    /// Parse settings and check every severity list.
    pub fn from_toml(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(text)?;
        settings.html.severity_mask()?;
        settings.console.severity_mask()?;
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading settings");
        Self::from_toml(&text)
    }
}
