//! Screenshot configuration
//!
//! Preview images are produced by an external headless browser. Disabled by
//! default since it needs Chromium (or a compatible browser) on the PATH.

use serde::Deserialize;

/// Headless browser settings for preview generation
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenshotConfig {
    /// Generate previews on create/update
    pub enabled: bool,
    /// Browser executable (name on PATH or absolute path)
    pub browser: String,
    /// Extra command-line arguments passed before the page URL
    pub args: Vec<String>,
    /// Kill the browser after this many seconds
    pub timeout_secs: u64,
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            browser: "chromium".to_string(),
            args: Vec::new(),
            timeout_secs: 30,
            width: 1280,
            height: 800,
        }
    }
}

/// Screenshot settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileScreenshot {
    pub enabled: Option<bool>,
    pub browser: Option<String>,
    pub args: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ScreenshotConfig {
    /// Create from file config with defaults; `browser_override` (env) wins over the file
    pub fn from_file(file: Option<FileScreenshot>, browser_override: Option<String>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            enabled: file.enabled.unwrap_or(defaults.enabled),
            browser: browser_override
                .or(file.browser)
                .unwrap_or(defaults.browser),
            args: file.args.unwrap_or(defaults.args),
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs).max(1),
            width: file.width.unwrap_or(defaults.width),
            height: file.height.unwrap_or(defaults.height),
        }
    }
}
