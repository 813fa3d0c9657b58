//! Subscriber setup. Logs go to stderr so reports on stdout stay parseable.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// # Errors
/// Fails on an invalid filter directive or when a subscriber is already set.
pub fn init(cfg: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cfg.level))?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match cfg.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    }
    .map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    tracing::debug!(level = %cfg.level, "Logging initialized");
    Ok(())
}
