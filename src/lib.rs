pub mod cli;
pub mod clients;
pub mod config;
pub mod db;
pub mod domain;
pub mod models;
pub mod services;
pub mod state;

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use clients::ApiFootballClient;
pub use config::Config;
use db::Store;
use domain::Intent;
use state::SharedState;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub async fn run() -> anyhow::Result<()> {
    let args = Cli::parse();

    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env file loaded: {e}");
    }

    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config)?;
    init_metrics(&config)?;

    let store = if args.memory {
        info!("Using in-memory cache store");
        Store::in_memory(&config.cache)
    } else {
        Store::connect(&config.cache)
            .await
            .with_context(|| format!("Failed to connect to {}", config.cache.redis_url))?
    };

    let provider = Arc::new(ApiFootballClient::new(
        &config.upstream,
        config.league_table(),
    )?);

    let state = SharedState::new(config, store, provider)?;

    match args.command {
        Commands::SeedTeams { league, season } => {
            cli::cmd_seed_teams(&state, &league, season).await
        }
        Commands::Team { id } => cli::cmd_team(&state, &id).await,
        Commands::Fixtures {
            league,
            team,
            season,
            from,
            to,
        } => cli::cmd_fixtures(&state, &league, team, season, from, to).await,
        Commands::Standings {
            league,
            season,
            cached,
        } => cli::cmd_standings(&state, &league, season, cached).await,
        Commands::Stats {
            league,
            season,
            team,
        } => cli::cmd_stats(&state, &league, season, &team.join(" ")).await,
        Commands::Dispatch {
            topic,
            league,
            teams,
            season,
            language,
        } => {
            let intent = Intent {
                topic,
                league,
                language,
                teams,
                season,
            };
            cli::cmd_dispatch(&state, intent).await
        }
        Commands::Ping => cli::cmd_ping(&state).await,
    }
}

fn init_tracing(config: &Config) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.general.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    result.context("Failed to initialize logging")
}

fn init_metrics(config: &Config) -> anyhow::Result<()> {
    if !config.observability.metrics_enabled {
        return Ok(());
    }

    use metrics_exporter_prometheus::PrometheusBuilder;

    let mut builder = PrometheusBuilder::new();
    if let Some(port) = config.observability.metrics_port {
        builder = builder.with_http_listener(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)));
        builder
            .install()
            .context("Failed to install Prometheus exporter")?;
        info!("Prometheus metrics exporter listening on port {}", port);
    } else {
        builder
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
    }

    Ok(())
}
