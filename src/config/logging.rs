//! The `[logging]` section
//!
//! ```toml
//! [logging]
//! level = "info"
//! dir = "./logs"       # omit for stdout only
//! rotation = "daily"
//! ```

use serde::Deserialize;
use std::path::PathBuf;

/// How often the JSON log file rolls over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    Hourly,
    #[default]
    Daily,
    Never,
}

impl Rotation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }
}

/// Log output. Deserialized as-is; missing keys fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level for the gallery's own events; `RUST_LOG` replaces the whole filter
    pub level: String,
    /// JSON log files are written here when set
    pub dir: Option<PathBuf>,
    pub rotation: Rotation,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: None,
            rotation: Rotation::Daily,
        }
    }
}
