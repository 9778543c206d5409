//! Command-line argument handling.

use std::path::PathBuf;

use thiserror::Error;
use trace_fmt::UnknownSeverity;

use crate::capture::{Capture, CaptureError};
use crate::render::{render_capture, Dialect, UnknownDialect};
use crate::settings::{Settings, SettingsError};

pub const USAGE: &str = "Usage: tracec <html|console> <capture.json> [--config <settings.toml>]";

/// Errors surfaced to the command line.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}\n{usage}", usage = USAGE)]
    Usage(String),

    #[error(transparent)]
    Dialect(#[from] UnknownDialect),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Capture(#[from] CaptureError),
}

impl From<UnknownSeverity> for CliError {
    fn from(err: UnknownSeverity) -> Self {
        CliError::Settings(SettingsError::Severity(err))
    }
}

/// Parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CliArgs {
    pub dialect: Dialect,
    pub capture: PathBuf,
    pub config: Option<PathBuf>,
}

/// Parse arguments, excluding the program name.
pub fn parse_args(args: &[String]) -> Result<CliArgs, CliError> {
    let mut positional = Vec::new();
    let mut config = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--config" || arg == "-c" {
            let Some(path) = iter.next() else {
                return Err(CliError::Usage(format!("missing value for `{arg}`")));
            };
            config = Some(PathBuf::from(path));
        } else if let Some(path) = arg.strip_prefix("--config=") {
            config = Some(PathBuf::from(path));
        } else if arg.starts_with('-') {
            return Err(CliError::Usage(format!("unknown option `{arg}`")));
        } else {
            positional.push(arg.as_str());
        }
    }

    match positional.as_slice() {
        [dialect, capture] => Ok(CliArgs {
            dialect: dialect.parse()?,
            capture: PathBuf::from(*capture),
            config,
        }),
        [] | [_] => Err(CliError::Usage("missing arguments".to_string())),
        [_, _, extra, ..] => Err(CliError::Usage(format!("unexpected argument `{extra}`"))),
    }
}

/// Run the command. `None` means nothing is printed.
pub fn run(args: &[String]) -> Result<Option<String>, CliError> {
    let args = parse_args(args)?;
    let settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let capture = Capture::load(&args.capture)?;
    Ok(render_capture(&capture, &settings, args.dialect)?)
}
