//! Arcana tarot reading backend: CLI and REST/WebSocket server.
//!
//! Binary name: `arcana`
//!
//! Loads configuration from the data directory, initializes tracing and the
//! services, then dispatches to a CLI command or starts the server.

mod cli;
mod http;
mod maintenance;
mod state;
mod transport;

use clap::Parser;
use console::style;

use arcana_infra::config::{load_config, resolve_data_dir};
use arcana_observe::tracing_setup::{init_tracing, shutdown_tracing};
use arcana_types::config::ArcanaConfig;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = resolve_data_dir();
    let mut config = load_config(&data_dir).await;
    apply_verbosity(&mut config, cli.verbose, cli.quiet);

    init_tracing(&config.logging).map_err(|e| anyhow::anyhow!("tracing init failed: {e}"))?;

    let state = AppState::init(data_dir, config).await?;
    let result = run(cli, state).await;

    shutdown_tracing();
    result
}

/// `-v`/`-vv` and `--quiet` override the configured log level.
fn apply_verbosity(config: &mut ArcanaConfig, verbose: u8, quiet: bool) {
    let level = match verbose {
        0 if quiet => "error",
        0 => return,
        1 => "info,arcana_api=debug,arcana_core=debug,arcana_infra=debug",
        _ => "trace",
    };
    config.logging.level = level.to_string();
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve { host, port } => serve(state, host, port).await?,
        Commands::User { action } => cli::user::run(&state, action, cli.json).await?,
        Commands::Token { action } => cli::user::run_token(&state, action, cli.json).await?,
        Commands::Topic { action } => cli::topic::run(&state, action, cli.json).await?,
        Commands::Card { action } => cli::card::run(&state, action, cli.json).await?,
        Commands::Horoscope { action } => cli::horoscope::run(&state, action, cli.json).await?,
        Commands::Sweep => cli::sweep::run(&state, cli.json).await?,
    }
    Ok(())
}

async fn serve(state: AppState, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let host = host.unwrap_or_else(|| state.config.server.host.clone());
    let port = port.unwrap_or(state.config.server.port);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    let scheduler = maintenance::start(&state).await?;

    println!(
        "  {} Arcana API listening on {}",
        style("⚡").bold(),
        style(format!("http://{addr}")).cyan()
    );
    println!("  {}", style("Press Ctrl+C to stop").dim());
    tracing::info!(%addr, "server started");

    let shutdown = state.shutdown.clone();
    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown.cancel();
        })
        .await?;

    if let Err(e) = scheduler.stop().await {
        tracing::warn!(error = %e, "failed to stop maintenance scheduler");
    }
    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
