#![forbid(unsafe_code)]

//! `geoprompt` — chat-driven map assistant server binary.
//!
//! Bootstraps configuration, registers the built-in capabilities, wires
//! the orchestrator, and serves the HTTP API until a shutdown signal.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use geoprompt::api::{self, ApiState};
use geoprompt::capabilities;
use geoprompt::config::GlobalConfig;
use geoprompt::orchestrator::ChatOrchestrator;
use geoprompt::planner::LlmPlanner;
use geoprompt::registry::CapabilityRegistry;
use geoprompt::stores::{
    ChatMemoryStore, InMemoryChatMemory, InMemoryPendingChoices, InMemorySelectionMemory,
};
use geoprompt::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "geoprompt", about = "Chat-driven map assistant server", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Override the configured HTTP port.
    #[arg(long)]
    port: Option<u16>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("geoprompt server bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => GlobalConfig::load_from_path(path)?,
        None => GlobalConfig::default(),
    };
    if let Some(port) = args.port {
        config.http_port = port;
    }
    info!("configuration loaded");

    let api_key = std::env::var(&config.planner.api_key_env).map_err(|_| {
        AppError::Config(format!(
            "planner API key missing: set the {} environment variable",
            config.planner.api_key_env
        ))
    })?;

    let mut registry = CapabilityRegistry::new(Duration::from_secs(
        config.capability_timeout_seconds,
    ));
    capabilities::register_builtins(&mut registry, &config.geo);
    let registry = Arc::new(registry);

    let chat_memory: Arc<dyn ChatMemoryStore> = Arc::new(InMemoryChatMemory::new());
    let pending_choices = Arc::new(InMemoryPendingChoices::new());
    let selection_memory = Arc::new(InMemorySelectionMemory::new());

    let planner = Arc::new(LlmPlanner::new(
        config.planner.base_url.clone(),
        config.planner.model.clone(),
        api_key,
        config.history_limit,
        Arc::clone(&chat_memory),
        Arc::clone(&registry),
    ));

    let orchestrator = Arc::new(ChatOrchestrator::new(
        planner,
        Arc::clone(&registry),
        chat_memory,
        pending_choices,
        selection_memory,
    ));

    let state = ApiState {
        orchestrator,
        registry,
    };

    api::serve(state, config.http_port, shutdown_signal()).await?;
    info!("geoprompt shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => {}
                    _ = sigterm.recv() => {}
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to register SIGTERM handler, using ctrl-c only");
                let _ = ctrl_c.await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(err) = ctrl_c.await {
            tracing::error!(%err, "ctrl-c signal handler failed");
        }
    }
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
