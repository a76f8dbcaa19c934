// Component Gallery - file-backed store for HTML blocks and templates
//
// Components live on disk as one folder per component:
//   <contents>/<type>/<folder>/{metadata.json, index.html, preview.png}
//
// Architecture:
// - Store: filesystem CRUD, listing and pagination
// - Server (axum): JSON API over the store plus the static front end
// - Render: optional headless-browser screenshots for previews
// - Export: static snapshot of the library for publishing

mod cli;
mod config;
mod export;
mod logging;
mod render;
mod server;
mod startup;
mod store;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use store::ComponentStore;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config management exits before anything else is initialized
    if let Some(Commands::Config {
        show,
        reset,
        edit,
        path,
    }) = &cli.command
    {
        cli::handle_config(*show, *reset, *edit, *path);
        return Ok(());
    }

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();

    match cli.command {
        Some(Commands::Export { out, contents }) => {
            if let Some(contents) = contents {
                config.contents_dir = contents;
            }
            let _log_guard = logging::init(&config.logging);
            run_export(&config, &out)
        }
        Some(Commands::Serve(args)) => {
            args.apply(&mut config);
            run_server(config).await
        }
        Some(Commands::Config { .. }) => Ok(()),
        None => run_server(config).await,
    }
}

fn run_export(config: &Config, out: &std::path::Path) -> Result<()> {
    let store = ComponentStore::new(config.contents_dir.clone());
    let summary = export::export(&store, out)?;

    println!(
        "Exported {} blocks and {} templates to {}",
        summary.blocks,
        summary.templates,
        out.display()
    );
    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    // Guard must live until exit so buffered file logs flush
    let _log_guard = logging::init(&config.logging);

    startup::print_startup(&config);
    startup::log_startup(&config);

    // Oneshot: the server stops accepting connections when this fires
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

    let mut server_handle =
        tokio::spawn(async move { server::start_server(config, shutdown_rx).await });

    tokio::select! {
        // Server exited on its own (bind failure, fatal error)
        joined = &mut server_handle => {
            return match joined {
                Ok(result) => result,
                Err(e) => Err(anyhow::anyhow!("Server task failed: {}", e)),
            };
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
        }
    }

    tracing::info!("Shutting down...");

    // If the send fails the server already stopped
    let _ = shutdown_tx.send(());

    match server_handle.await {
        Ok(result) => result?,
        Err(e) => tracing::error!("Server task failed: {}", e),
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
