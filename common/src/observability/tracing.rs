//! Tracing initialization.
//!
//! Centralizes tracing config so both binaries behave the same.

use crate::ColorWhen;
use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize tracing subscriber.
///
/// - Respects `RUST_LOG` via `EnvFilter`.
/// - ANSI color controlled by `ColorWhen`.
/// - Writes to stderr; stdout carries colcon's own output.
pub fn init_tracing(color: ColorWhen) -> Result<()> {
    // ---
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(color.should_color_stderr())
        .try_init()
        .map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))?;

    Ok(())
}
