//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Serialize the configuration as a commented config file
    pub fn to_toml(&self) -> String {
        let log_dir = match &self.logging.dir {
            Some(dir) => format!("dir = {:?}\n", dir.display().to_string()),
            None => "# dir = \"./logs\"\n".to_string(),
        };

        let static_dir = match &self.static_dir {
            Some(dir) => format!("static_dir = {:?}\n", dir.display().to_string()),
            None => "# static_dir = \"./dist\"\n".to_string(),
        };

        format!(
            r#"# gallery configuration

# HTTP bind address
bind_addr = "{bind}"

# Root directory of stored components (<contents>/blocks, <contents>/templates)
contents_dir = {contents:?}

# Front-end bundle served for non-API paths
{static_dir}
# Default listing page size (?limit= overrides, max 100)
page_size = {page_size}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# JSON log files (gallery.<date>) in addition to stdout
{log_dir}rotation = "{log_rotation}"  # hourly, daily, never

# Preview screenshots via a headless browser (GALLERY_BROWSER overrides browser)
[screenshot]
enabled = {shot_enabled}
browser = {shot_browser:?}
args = {shot_args:?}
timeout_secs = {shot_timeout}
width = {shot_width}
height = {shot_height}
"#,
            bind = self.bind_addr,
            contents = self.contents_dir.display().to_string(),
            static_dir = static_dir,
            page_size = self.page_size,
            log_level = self.logging.level,
            log_dir = log_dir,
            log_rotation = self.logging.rotation.as_str(),
            shot_enabled = self.screenshot.enabled,
            shot_browser = self.screenshot.browser,
            shot_args = self.screenshot.args,
            shot_timeout = self.screenshot.timeout_secs,
            shot_width = self.screenshot.width,
            shot_height = self.screenshot.height,
        )
    }
}
