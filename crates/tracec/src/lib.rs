//! Command-line front-end for trace rendering.
//!
//! Reads a JSON capture (see [`capture`]), applies the per-dialect settings
//! from a TOML file (see [`settings`]), and renders the trace when the
//! capture's severity is handled.

pub mod capture;
pub mod cli;
pub mod render;
pub mod settings;

pub use capture::{Capture, CaptureError};
pub use cli::{parse_args, run, CliArgs, CliError};
pub use render::{render_capture, Dialect, UnknownDialect};
pub use settings::{RendererSettings, Settings, SettingsError};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, e.g.
/// `RUST_LOG=trace_fmt=debug`. Set `TRACEC_LOG_TREE=1` for indented span
/// output.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_err() {
            return;
        }

        let filter = EnvFilter::from_default_env();
        let registry = tracing_subscriber::registry().with(filter);
        if std::env::var("TRACEC_LOG_TREE").is_ok_and(|v| v == "1") {
            registry
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .init();
        } else {
            registry
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_level(true)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
    });
}
