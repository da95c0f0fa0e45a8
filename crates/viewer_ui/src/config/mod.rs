//! Configuration system
//!
//! Any `serde` type can be read from and written to `.toml` or `.ron` files
//! through the [`Config`] trait. [`ViewerConfig`] is the application's own
//! configuration: window geometry, GL context hints, logging and clear
//! colour.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::foundation::logging::LoggingConfig;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file, format chosen by extension
    ///
    /// # Errors
    /// I/O, parse and unsupported-extension errors.
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match Format::of(path)? {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Load from `path` if it exists, otherwise return the defaults
    ///
    /// # Errors
    /// Same as [`load_from_file`](Self::load_from_file) for an existing file.
    fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::debug!("{} not found, using default configuration", path.display());
            Ok(Self::default())
        }
    }

    /// Save configuration to file, format chosen by extension
    ///
    /// # Errors
    /// I/O, serialization and unsupported-extension errors.
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// GL context requested from the windowing layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextHints {
    /// Minimum major version
    pub major: u32,
    /// Minimum minor version
    pub minor: u32,
    /// Request a core profile
    pub core_profile: bool,
    /// Request a forward-compatible context
    pub forward_compatible: bool,
    /// Swap interval of one
    pub vsync: bool,
}

impl Default for ContextHints {
    fn default() -> Self {
        Self {
            major: 3,
            minor: 2,
            core_profile: true,
            forward_compatible: true,
            vsync: true,
        }
    }
}

/// Window geometry and context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Client width in screen coordinates
    pub width: u32,
    /// Client height in screen coordinates
    pub height: u32,
    /// Title bar text
    pub title: String,
    /// Context hints
    pub context: ContextHints,
}

impl WindowConfig {
    /// Window of the given size and title with default context hints
    pub fn new(width: u32, height: u32, title: impl Into<String>) -> Self {
        Self {
            width,
            height,
            title: title.into(),
            context: ContextHints::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new(1024, 576, "Viewer")
    }
}

/// Serializable logging options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `env_logger` filter; `RUST_LOG` applies when unset
    pub filter: Option<String>,
    /// Force colours off
    pub no_color: bool,
}

impl LoggingSettings {
    /// Logger configuration for [`foundation::logging::init`](crate::foundation::logging::init)
    pub fn to_logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            env_filter: self.filter.clone(),
            write_style: if self.no_color {
                env_logger::WriteStyle::Never
            } else {
                env_logger::WriteStyle::Auto
            },
        }
    }
}

/// Top-level viewer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Main window
    pub window: WindowConfig,
    /// Logging
    pub logging: LoggingSettings,
    /// Background colour, RGBA
    pub clear_color: [f32; 4],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            logging: LoggingSettings::default(),
            clear_color: [0.45, 0.55, 0.60, 1.00],
        }
    }
}

impl Config for ViewerConfig {}
