//! Logging utilities and structured logging support

use std::sync::Once;

pub use log::{debug, error, info, trace, warn};

/// Logger configuration
///
/// `env_filter` uses the `env_logger` filter syntax (e.g. "info",
/// "viewer_ui=debug,viewer=trace").
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Explicit filter; falls back to `RUST_LOG`, then `info`
    pub env_filter: Option<String>,
    /// ANSI colouring
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Initialize the global logger
///
/// Only the first call has any effect.
pub fn init(config: &LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = &config.env_filter {
            builder.parse_filters(filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
        }

        builder.write_style(config.write_style);
        builder.init();

        log::debug!("logging initialized");
    });
}

/// Whether [`init`] has run
pub fn is_initialized() -> bool {
    INIT.is_completed()
}
