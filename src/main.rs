// aulos - Terminal YouTube Music player
// Search with yt-dlp, play through mpv, steer it over its IPC socket

mod config;
mod player;
mod search;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use config::Config;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::App;

#[derive(Parser)]
#[command(name = "aulos")]
#[command(about = "A terminal YouTube Music player driving mpv")]
struct Args {
    /// Enable developer logging (debug level)
    #[arg(long)]
    dev: bool,
}

fn init_logging(dev: bool) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("aulos")
        .join("logs");
    std::fs::create_dir_all(&log_dir)?;

    // Daily rotating file appender; the prompt stays clean.
    let file_appender = tracing_appender::rolling::daily(&log_dir, "aulos.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let default_filter = if dev { "debug" } else { "info,aulos=debug" };
    let base_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(base_filter)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Keep the appender guard alive for the whole run
    std::mem::forget(guard);

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.dev)?;
    info!("🎵 aulos starting up");

    // Load config - falls back to defaults if missing
    let config = Config::load()?;

    if let Err(e) = search::ensure_dependencies(&config.player.binary, &config.search.binary) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    // The one fatal setup step: without a place for the IPC socket there
    // is no session to run.
    let socket_path = player::session_socket_path()
        .context("could not set up the player control socket")?;

    let mut app = App::new(&config, socket_path);
    app.run().await?;

    Ok(())
}
