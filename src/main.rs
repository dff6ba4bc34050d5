use anyhow::Context;
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use bettracker::adapters::{start_api_server, PostgresStore};
use bettracker::api::{AppState, JwtKeys};
use bettracker::cli::{Cli, Commands};
use bettracker::config::AppConfig;
use bettracker::logging::{init_logging, init_logging_simple};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load_from(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config))?;

    match cli.command {
        Commands::Serve { no_migrate } => {
            init_logging(&config.logging);
            run_server(config, !no_migrate).await?;
        }
        Commands::Migrate => {
            init_logging_simple();
            let store = PostgresStore::new(&config.database).await?;
            store.migrate().await?;
            println!("Migrations applied");
        }
        Commands::Token { email, name } => {
            init_logging_simple();
            let store = PostgresStore::new(&config.database).await?;
            let user_id = store.upsert_user(&email, name.as_deref()).await?;
            let token = JwtKeys::from_config(&config.auth).issue(user_id, &email)?;
            println!("user_id: {}", user_id);
            println!("token:   {}", token);
        }
    }

    Ok(())
}

async fn run_server(config: AppConfig, migrate: bool) -> anyhow::Result<()> {
    let store = Arc::new(PostgresStore::new(&config.database).await?);
    if migrate {
        store.migrate().await?;
    }

    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .with_context(|| format!("invalid bind address {}", config.bind_addr()))?;

    let state = AppState::new(
        store,
        JwtKeys::from_config(&config.auth),
        config.budget.default_alert_threshold,
    );

    info!(%addr, "starting bettracker");
    start_api_server(state, addr).await?;
    Ok(())
}
