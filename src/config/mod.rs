//! Configuration for the gallery server
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/gallery/config.toml)
//! 3. Built-in defaults (lowest priority)

use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod logging;
mod screenshot;
mod serialization;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports (maintain public API)
// ─────────────────────────────────────────────────────────────────────────────

pub use logging::{LoggingConfig, Rotation};
pub use screenshot::{FileScreenshot, ScreenshotConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_CONTENTS_DIR: &str = "./contents";
const DEFAULT_PAGE_SIZE: usize = 12;

/// Upper bound for `?limit=` on listings
pub const MAX_PAGE_SIZE: usize = 100;

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server to
    pub bind_addr: SocketAddr,

    /// Root of the component tree (`<contents>/<type>/<folder>/...`)
    pub contents_dir: PathBuf,

    /// Front-end bundle served for non-API paths
    pub static_dir: Option<PathBuf>,

    /// Listing page size when the request gives no `limit`
    pub page_size: usize,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Preview screenshot generation
    pub screenshot: ScreenshotConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            contents_dir: PathBuf::from(DEFAULT_CONTENTS_DIR),
            static_dir: None,
            page_size: DEFAULT_PAGE_SIZE,
            logging: LoggingConfig::default(),
            screenshot: ScreenshotConfig::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub bind_addr: Option<String>,
    pub contents_dir: Option<String>,
    pub static_dir: Option<String>,
    pub page_size: Option<usize>,

    /// Optional [logging] section
    pub logging: Option<LoggingConfig>,

    /// Optional [screenshot] section
    pub screenshot: Option<FileScreenshot>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/gallery/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("gallery").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Load file config if it exists
    ///
    /// # Exits
    /// If the config file exists but cannot be read or parsed. A broken
    /// config should fail fast rather than silently fall back to defaults.
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("\nCONFIG ERROR - Failed to parse configuration file\n");
                    eprintln!("  File: {}\n", path.display());
                    eprintln!("  Error: {}\n", e);
                    eprintln!("  Tip: Check for:\n");
                    eprintln!("    - Missing quotes around string values");
                    eprintln!("    - Invalid boolean values (use true/false)");
                    eprintln!("    - Typos in section names\n");
                    eprintln!("  To reset, run `gallery config --reset`.\n");
                    std::process::exit(1);
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => FileConfig::default(),
            Err(e) => {
                eprintln!("\nCONFIG ERROR - Cannot read configuration file\n");
                eprintln!("  File: {}\n", path.display());
                eprintln!("  Error: {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Load configuration: env vars > file > defaults
    pub fn from_env() -> Self {
        let file = Self::load_file_config();
        match Self::resolve(file, |key| std::env::var(key).ok()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("\nCONFIG ERROR - {}\n", e);
                std::process::exit(1);
            }
        }
    }

    /// Merge a parsed config file with environment lookups
    pub(crate) fn resolve(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        use anyhow::Context;

        // Bind address: env > file > default
        let bind = env("GALLERY_BIND")
            .or(file.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .parse()
            .with_context(|| format!("Invalid bind address: {}", bind))?;

        // Contents directory: env > file > default
        let contents_dir = env("GALLERY_CONTENTS_DIR")
            .or(file.contents_dir)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENTS_DIR));

        // Static assets: env > file > none
        let static_dir = env("GALLERY_STATIC_DIR")
            .or(file.static_dir)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        // Page size: file > default, kept within [1, MAX_PAGE_SIZE]
        let page_size = file
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);

        let logging = file.logging.unwrap_or_default();
        let screenshot = ScreenshotConfig::from_file(file.screenshot, env("GALLERY_BROWSER"));

        Ok(Self {
            bind_addr,
            contents_dir,
            static_dir,
            page_size,
            logging,
            screenshot,
        })
    }
}
