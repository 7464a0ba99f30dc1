pub mod api;
pub mod cli;
pub mod clock;
pub mod config;
pub mod constants;
pub mod domain;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod state;
pub mod store;

use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
pub use config::Config;
use metrics_exporter_prometheus::PrometheusHandle;
use scheduler::Scheduler;
use state::SharedState;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, Layer};

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    config.validate()?;

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        Some(handle)
    } else {
        None
    };

    init_tracing(&config)?;
    if prometheus_handle.is_some() {
        info!("Prometheus metrics recorder initialized");
    }

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_daemon(config, prometheus_handle).await,

        Commands::Register { user_id } => {
            let state = SharedState::new(config).await?;
            cli::cmd_register(&state, &user_id).await
        }

        Commands::Leaderboard { limit } => {
            let state = SharedState::new(config).await?;
            cli::cmd_leaderboard(&state, limit).await
        }

        Commands::Stats => {
            let state = SharedState::new(config).await?;
            cli::cmd_stats(&state).await
        }

        Commands::Reset => {
            let state = SharedState::new(config).await?;
            cli::cmd_reset(&state).await
        }

        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists, leaving it untouched.");
            }
            Ok(())
        }
    }
}

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let fmt_layer = if config.general.json_logs {
        tracing_subscriber::fmt::layer().json().boxed()
    } else {
        tracing_subscriber::fmt::layer().boxed()
    };

    let loki_layer = if config.observability.loki_enabled {
        let url = url::Url::parse(&config.observability.loki_url).context("Invalid Loki URL")?;

        let mut builder = tracing_loki::builder();
        for (key, value) in &config.observability.loki_labels {
            builder = builder.label(key.as_str(), value.as_str())?;
        }
        let (layer, task) = builder.build_url(url)?;

        tokio::spawn(task);
        Some(layer)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .with(loki_layer)
        .init();

    if config.observability.loki_enabled {
        info!(
            "Loki logging initialized at {}",
            config.observability.loki_url
        );
    }

    Ok(())
}

async fn run_daemon(config: Config, prometheus_handle: Option<PrometheusHandle>) -> anyhow::Result<()> {
    info!(
        "Upsen v{} starting in daemon mode...",
        env!("CARGO_PKG_VERSION")
    );

    let shared = Arc::new(SharedState::new(config.clone()).await?);

    let mut scheduler = Scheduler::new(Arc::clone(&shared.activity), config.store.clone());
    scheduler.start().await?;

    let server_handle: Option<tokio::task::JoinHandle<()>> = if config.server.enabled {
        let addr = format!("{}:{}", config.server.host, config.server.port);
        info!("Starting Web API on {}", addr);

        let app = api::router(api::create_app_state(Arc::clone(&shared), prometheus_handle));
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        Some(tokio::spawn(async move {
            info!("🌐 Web Server running at http://{}", addr);
            if let Err(e) = axum::serve(listener, app).await {
                error!("Web server error: {}", e);
            }
        }))
    } else {
        None
    };

    info!("Daemon running. Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received");
        }
        Err(e) => {
            error!("Error listening for shutdown: {}", e);
        }
    }

    if let Some(handle) = server_handle {
        handle.abort();
    }
    if let Err(e) = scheduler.shutdown().await {
        error!("Failed to flush store on shutdown: {}", e);
    }
    info!("Daemon stopped");

    Ok(())
}
