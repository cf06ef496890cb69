pub mod cli;
pub mod clients;
pub mod config;
pub mod constants;
pub mod db;
pub mod domain;
pub mod entities;
pub mod models;
pub mod scheduler;
pub mod services;
pub mod state;

use std::sync::Arc;
use tokio::signal;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, ConfigCommands};
pub use config::Config;
use scheduler::Scheduler;
use state::AppState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::load()?;
    config.validate()?;

    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let mut log_level = config.general.log_level.clone();
    if config.general.suppress_connection_errors {
        log_level.push_str(",reqwest::retry=off,hyper_util=off");
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

    let fmt_layer = tracing_subscriber::fmt::layer();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Daemon => run_daemon(config).await,

        Commands::Check => cli::cmd_check(&config).await,

        Commands::Search { query } => cli::cmd_search(&config, &query.join(" ")).await,

        Commands::Discover { chart, kind } => cli::cmd_discover(&config, &chart, &kind).await,

        Commands::Similar { id, kind } => cli::cmd_similar(&config, id, &kind).await,

        Commands::Info { id, kind } => cli::cmd_title_info(&config, id, &kind).await,

        Commands::Import { id, kind } => cli::cmd_import(&config, id, &kind).await,

        Commands::Collection { id, import } => cli::cmd_collection(&config, id, import).await,

        Commands::List => cli::cmd_list(&config).await,

        Commands::Remove { id } => cli::cmd_remove(&config, &id).await,

        Commands::Resolve { id, kind } => cli::cmd_resolve(&config, id, &kind).await,

        Commands::Sync { id, kind } => cli::cmd_sync(&config, id, kind.as_deref()).await,

        Commands::Episodes { id, season } => cli::cmd_episodes(&config, id, season).await,

        Commands::Config { command } => match command {
            ConfigCommands::Get { key } => cli::cmd_config_get(&config, &key).await,
            ConfigCommands::Set { key, value } => {
                cli::cmd_config_set(&config, &key, &value).await
            }
        },

        Commands::Init => {
            Config::create_default_if_missing()?;
            println!("✓ Config file created. Edit config.toml and run again.");
            Ok(())
        }
    }
}

async fn run_daemon(config: Config) -> anyhow::Result<()> {
    info!(
        "Vodarr v{} starting in daemon mode...",
        env!("CARGO_PKG_VERSION")
    );

    let state = AppState::new(config.clone()).await?;

    let scheduler = Arc::new(Scheduler::new(
        Arc::clone(&state.import_service),
        config.scheduler.clone(),
    ));

    let scheduler_handle = {
        let sched = Arc::clone(&scheduler);
        tokio::spawn(async move {
            if let Err(e) = sched.start().await {
                error!("Scheduler error: {}", e);
            }
        })
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

    scheduler.stop().await;
    scheduler_handle.abort();
    info!("Daemon stopped");

    Ok(())
}
