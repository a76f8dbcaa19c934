// CLI module - command-line argument parsing and handlers
//
// Subcommands:
// - serve (default): run the HTTP server
// - export: write a static snapshot of the component library
// - config --show | --reset | --edit | --path: configuration management

use crate::config::{Config, VERSION};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::Command;

/// Component gallery - file-backed store for HTML blocks and templates
#[derive(Parser)]
#[command(name = "gallery")]
#[command(version = VERSION)]
#[command(about = "File-backed component gallery server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve(ServeArgs),

    /// Export every component to static HTML plus JSON indexes
    Export {
        /// Output directory
        #[arg(long, default_value = "dist")]
        out: PathBuf,

        /// Contents directory (overrides config)
        #[arg(long)]
        contents: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,
    },
}

/// Overrides for `gallery serve`
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Address to bind (overrides config and GALLERY_BIND)
    #[arg(long)]
    pub bind: Option<SocketAddr>,

    /// Contents directory (overrides config and GALLERY_CONTENTS_DIR)
    #[arg(long)]
    pub contents: Option<PathBuf>,

    /// Static front-end directory (overrides config and GALLERY_STATIC_DIR)
    #[arg(long = "static")]
    pub static_dir: Option<PathBuf>,
}

impl ServeArgs {
    /// Apply command-line overrides on top of loaded configuration
    pub fn apply(&self, config: &mut Config) {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(contents) = &self.contents {
            config.contents_dir = contents.clone();
        }
        if let Some(static_dir) = &self.static_dir {
            config.static_dir = Some(static_dir.clone());
        }
    }
}

/// Handle the `config` subcommand
pub fn handle_config(show: bool, reset: bool, edit: bool, path: bool) {
    if path {
        handle_config_path();
    } else if show {
        handle_config_show();
    } else if reset {
        handle_config_reset();
    } else if edit {
        handle_config_edit();
    } else {
        println!("Usage: gallery config [--show|--reset|--edit|--path]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --reset   Reset config file to defaults");
        println!("  --edit    Open config file in $EDITOR");
        println!("  --path    Show config file path");
    }
}

fn handle_config_path() {
    match Config::config_path() {
        Some(path) => println!("{}", path.display()),
        None => {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
    }
}

fn handle_config_show() {
    let config = Config::from_env();

    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        let _ = std::io::stderr().flush();

        let mut input = String::new();
        if std::io::stdin().read_line(&mut input).is_err()
            || !input.trim().eq_ignore_ascii_case("y")
        {
            println!("Aborted.");
            return;
        }
    }

    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(&path, Config::default().to_toml()) {
        eprintln!("Error writing config: {}", e);
        std::process::exit(1);
    }

    println!("Config reset to defaults: {}", path.display());
}

fn handle_config_edit() {
    let Some(path) = Config::config_path() else {
        eprintln!("Error: Could not determine config path");
        std::process::exit(1);
    };

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    match Command::new(&editor).arg(&path).status() {
        Ok(status) if status.success() => {}
        Ok(status) => {
            eprintln!("Editor exited with status: {}", status);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to launch editor '{}': {}", editor, e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::try_parse_from([
            "gallery",
            "serve",
            "--bind",
            "0.0.0.0:8000",
            "--contents",
            "/data/contents",
        ])
        .unwrap();

        let Some(Commands::Serve(args)) = cli.command else {
            panic!("expected serve");
        };

        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.bind_addr.port(), 8000);
        assert_eq!(config.contents_dir, PathBuf::from("/data/contents"));
        assert_eq!(config.static_dir, None);
    }

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["gallery"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_export_defaults() {
        let cli = Cli::try_parse_from(["gallery", "export"]).unwrap();
        match cli.command {
            Some(Commands::Export { out, contents }) => {
                assert_eq!(out, PathBuf::from("dist"));
                assert!(contents.is_none());
            }
            _ => panic!("expected export"),
        }
    }
}
