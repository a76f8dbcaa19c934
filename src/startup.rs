// Startup module - displays banner and module status
//
// Shows version, where configuration came from, and which optional pieces
// (screenshots, static assets, file logging) are active.

use crate::config::{Config, VERSION};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GREEN: &str = "\x1b[32m";
    pub const MAGENTA: &str = "\x1b[35m";
}

/// Module status for display
pub struct ModuleStatus {
    pub name: &'static str,
    pub enabled: bool,
    pub description: String,
}

/// Status of all modules based on config
fn module_status(config: &Config) -> Vec<ModuleStatus> {
    vec![
        ModuleStatus {
            name: "store",
            enabled: true, // Core, always on
            description: format!("Contents at {}", config.contents_dir.display()),
        },
        ModuleStatus {
            name: "api",
            enabled: true, // Core, always on
            description: "JSON CRUD endpoints".to_string(),
        },
        ModuleStatus {
            name: "screenshots",
            enabled: config.screenshot.enabled,
            description: format!("Headless previews via {}", config.screenshot.browser),
        },
        ModuleStatus {
            name: "static",
            enabled: config.static_dir.is_some(),
            description: match &config.static_dir {
                Some(dir) => format!("Front end from {}", dir.display()),
                None => "Front end bundle".to_string(),
            },
        },
        ModuleStatus {
            name: "file-log",
            enabled: config.logging.dir.is_some(),
            description: match &config.logging.dir {
                Some(dir) => format!("JSON logs in {}", dir.display()),
                None => "JSON log files".to_string(),
            },
        },
    ]
}

/// Print the startup banner and module status
pub fn print_startup(config: &Config) {
    use colors::*;

    println!();
    println!("  {BOLD}{CYAN}Component Gallery{RESET} {DIM}v{VERSION}{RESET}");
    println!("  {DIM}File-backed blocks and templates{RESET}");
    println!();

    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("  {DIM}Config:{RESET} {GREEN}✓{RESET} {}", path.display());
        } else {
            println!("  {DIM}Config:{RESET} {DIM}(using defaults){RESET}");
        }
    }
    println!();

    for module in &module_status(config) {
        let (icon, style) = if module.enabled {
            (format!("{GREEN}✓{RESET}"), "")
        } else {
            (format!("{DIM}○{RESET}"), DIM)
        };
        println!(
            "    {icon} {style}{:<12}{RESET} {DIM}{}{RESET}",
            module.name, module.description
        );
    }

    println!();
    println!(
        "  {MAGENTA}▸{RESET} Listening on {BOLD}http://{}{RESET}",
        config.bind_addr
    );
    println!();
}

/// Log the same information through tracing (ends up in file logs)
pub fn log_startup(config: &Config) {
    tracing::info!("gallery v{} starting", VERSION);
    for module in &module_status(config) {
        let icon = if module.enabled { "✓" } else { "○" };
        tracing::info!("  {} {} - {}", icon, module.name, module.description);
    }
}
