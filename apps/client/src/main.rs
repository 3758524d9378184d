mod api_client;
mod cli;
mod config;
mod errors;
mod models;
mod navigator;
mod panels;
mod render;
mod session;
mod shell;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api_client::HttpResumeApi;
use crate::cli::Cli;
use crate::config::Config;
use crate::render::PlainPdfRenderer;
use crate::session::provider::SupabaseAuth;
use crate::session::storage::SessionFile;
use crate::session::SessionStore;
use crate::shell::App;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    cli.apply(&mut config);

    // Logs go to stderr; stdout belongs to the shell.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting resume client v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Backend {} (timeout {:?}), auth policies {:?}",
        config.api_base_url, config.request_timeout, config.endpoint_auth
    );

    let api = HttpResumeApi::new(&config.api_base_url, config.request_timeout)
        .context("Failed to build backend client")?;
    let auth = SupabaseAuth::new(
        &config.supabase_url,
        &config.supabase_anon_key,
        config.request_timeout,
    )
    .context("Failed to build auth client")?;
    let storage = config.session_file.clone().map(SessionFile::new);
    if let Some(file) = &storage {
        info!("Persisting session at {}", file.path().display());
    }
    let session = SessionStore::new(Arc::new(auth), storage);

    let state = AppState {
        config: config.clone(),
        api: Arc::new(api),
        renderer: Arc::new(PlainPdfRenderer),
    };

    let mut app = App::new(state, session);
    app.start(&cli.start).await;
    shell::run(app).await
}
