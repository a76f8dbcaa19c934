//! Preview rendering through a headless browser
//!
//! The browser is treated as a black box: we hand it a standalone HTML file
//! and ask for a PNG. Rendering is always optional. A failure is logged and
//! the component is saved without a preview.
//!
//! ```text
//! PreviewRenderer trait
//! ├── NoOpRenderer (screenshots disabled)
//! └── HeadlessBrowserRenderer (chromium --headless --screenshot)
//! ```

use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::process::Command;

use crate::config::ScreenshotConfig;
use crate::store::encode_png_data_url;

/// Errors from preview rendering
#[derive(Debug)]
pub enum RenderError {
    /// Screenshots are disabled
    NotConfigured,
    /// The browser could not be started
    Spawn(String),
    /// The browser did not finish in time and was killed
    Timeout { secs: u64 },
    /// The browser exited unsuccessfully or produced no image
    Failed(String),
    /// Scratch file handling failed
    Io(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => write!(f, "Screenshot rendering not configured"),
            Self::Spawn(msg) => write!(f, "Failed to launch browser: {}", msg),
            Self::Timeout { secs } => write!(f, "Browser timed out after {} seconds", secs),
            Self::Failed(msg) => write!(f, "Browser failed: {}", msg),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {}

/// Turns component HTML into a PNG preview
#[async_trait]
pub trait PreviewRenderer: Send + Sync {
    /// Human-readable name for logging
    fn name(&self) -> &'static str;

    /// Whether `render` can be expected to work
    fn is_ready(&self) -> bool;

    /// Render `html` (a fragment, not a full document) to PNG bytes
    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError>;
}

/// Renderer used when screenshots are disabled
#[derive(Debug, Default)]
pub struct NoOpRenderer;

#[async_trait]
impl PreviewRenderer for NoOpRenderer {
    fn name(&self) -> &'static str {
        "noop"
    }

    fn is_ready(&self) -> bool {
        false
    }

    async fn render(&self, _html: &str) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::NotConfigured)
    }
}

/// Runs a Chromium-compatible browser in headless screenshot mode
#[derive(Debug, Clone)]
pub struct HeadlessBrowserRenderer {
    browser: String,
    extra_args: Vec<String>,
    timeout: Duration,
    width: u32,
    height: u32,
}

impl HeadlessBrowserRenderer {
    pub fn new(config: &ScreenshotConfig) -> Self {
        Self {
            browser: config.browser.clone(),
            extra_args: config.args.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            width: config.width,
            height: config.height,
        }
    }

    fn build_command(&self, html_url: &str, png_path: &Path) -> Command {
        let mut command = Command::new(&self.browser);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--hide-scrollbars")
            .arg(format!("--window-size={},{}", self.width, self.height))
            .arg(format!("--screenshot={}", png_path.display()))
            .args(&self.extra_args)
            .arg(html_url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        command
    }
}

#[async_trait]
impl PreviewRenderer for HeadlessBrowserRenderer {
    fn name(&self) -> &'static str {
        "headless-browser"
    }

    fn is_ready(&self) -> bool {
        true
    }

    async fn render(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let scratch = tempfile::tempdir().map_err(|e| RenderError::Io(e.to_string()))?;
        let html_path = scratch.path().join("preview.html");
        let png_path = scratch.path().join("preview.png");
        tokio::fs::write(&html_path, wrap_document(html))
            .await
            .map_err(|e| RenderError::Io(e.to_string()))?;

        let html_url = format!("file://{}", html_path.display());
        let mut child = self
            .build_command(&html_url, &png_path)
            .spawn()
            .map_err(|e| RenderError::Spawn(format!("{}: {}", self.browser, e)))?;

        // Dropping the child on timeout kills the browser
        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(e)) => return Err(RenderError::Failed(e.to_string())),
            Err(_) => {
                return Err(RenderError::Timeout {
                    secs: self.timeout.as_secs(),
                })
            }
        };

        if !status.success() {
            return Err(RenderError::Failed(format!("exited with {}", status)));
        }

        match tokio::fs::read(&png_path).await {
            Ok(png) if !png.is_empty() => Ok(png),
            Ok(_) => Err(RenderError::Failed("empty screenshot".to_string())),
            Err(e) => Err(RenderError::Failed(format!("no screenshot written: {}", e))),
        }
    }
}

/// Embed a component fragment in a standalone page with Tailwind loaded
pub fn wrap_document(html: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Component Preview</title>
    <script src="https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4"></script>
    <style>
      body {{
        margin: 0;
        padding: 0;
        font-family: system-ui, -apple-system, sans-serif;
        background-color: #ffffff;
        overflow: hidden;
      }}
      * {{
        box-sizing: border-box;
      }}
    </style>
  </head>
  <body>
{html}
  </body>
</html>
"#
    )
}

/// Pick a renderer from configuration
pub fn create_renderer(config: &ScreenshotConfig) -> Arc<dyn PreviewRenderer> {
    if config.enabled {
        Arc::new(HeadlessBrowserRenderer::new(config))
    } else {
        Arc::new(NoOpRenderer)
    }
}

/// Render a preview as a PNG data URL, or `None` when rendering is off or fails
pub async fn capture_preview(renderer: &dyn PreviewRenderer, html: &str) -> Option<String> {
    if !renderer.is_ready() {
        return None;
    }

    let start = Instant::now();
    match renderer.render(html).await {
        Ok(png) => {
            tracing::debug!(
                renderer = renderer.name(),
                bytes = png.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Preview rendered"
            );
            Some(encode_png_data_url(&png))
        }
        Err(e) => {
            tracing::warn!(renderer = renderer.name(), error = %e, "Preview generation failed");
            None
        }
    }
}
