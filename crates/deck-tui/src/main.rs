mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod theme;
mod widgets;

use std::path::PathBuf;

use clap::Parser;

use deck_core::api::build_http_client;
use deck_core::config::Config;
use deck_core::platform;
use deck_core::session::Session;
use deck_core::store::SettingsStore;

/// Terminal dashboard for a remote torrent backend.
#[derive(Debug, Parser)]
#[command(name = "magnetdeck", version)]
struct Cli {
    /// Backend URL to connect to (overrides the saved one).
    url: Option<String>,

    /// Config file to use instead of the default location.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = platform::log_file();
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // RUST_LOG wins; otherwise debug for our crates with the HTTP stack quiet.
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    eprintln!("magnetdeck log: {}", log_path.display());
    tracing::info!("magnetdeck starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .unwrap_or_else(|e| {
        tracing::warn!("config unreadable, using defaults: {}", e);
        Config::default()
    });

    // ── Session ──────────────────────────────────────────────────────────────
    let http = build_http_client(&config.api)?;
    let store = SettingsStore::new(platform::session_file());
    let session = Session::load(store, http, config.api.probe_timeout());

    let initial_url = cli
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(session, config, initial_url);
    app.run().await?;

    Ok(())
}
