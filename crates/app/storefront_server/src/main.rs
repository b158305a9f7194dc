//! Storefront auth API server binary.

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

/// CLI arguments for the API server.
#[derive(Parser, Debug)]
#[command(name = "storefront_server", about = "Storefront auth API server")]
struct Args {
    /// Address to bind the HTTP listener.
    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8080")]
    bind_addr: String,

    /// PostgreSQL connection URL.
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost:5432/storefront"
    )]
    database_url: String,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Interval between expired-refresh-token purge sweeps, in seconds.
    #[arg(long, env = "PURGE_INTERVAL_SECS", default_value_t = 3600)]
    purge_interval_secs: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "info,storefront_api=debug,storefront_core=debug"
                    .parse()
                    .unwrap()
            }),
        )
        .init();

    let args = Args::parse();

    let mut config = storefront_api::config::ApiConfig::from_env();
    config.bind_addr = args.bind_addr;
    config.database_url = args.database_url;

    info!(database_url = %config.database_url, bind_addr = %config.bind_addr, "starting storefront_server");

    let pool = PgPoolOptions::new()
        .max_connections(args.max_connections)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect(&config.database_url)
        .await?;

    info!("running database migrations");
    storefront_api::migrate(&pool).await?;

    // Scheduled ledger maintenance: the ledger never purges from within
    // request handling.
    let purge_pool = pool.clone();
    tokio::spawn(async move {
        let mut ticker =
            tokio::time::interval(std::time::Duration::from_secs(args.purge_interval_secs));
        loop {
            ticker.tick().await;
            match storefront_core::auth::refresh::purge_expired(&purge_pool, chrono::Utc::now())
                .await
            {
                Ok(0) => {}
                Ok(n) => info!(purged = n, "removed expired refresh tokens"),
                Err(e) => warn!(error = %e, "expired-token purge failed"),
            }
        }
    });

    let state = storefront_api::AppState {
        pool,
        config: config.clone(),
    };
    let app = storefront_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await?;

    Ok(())
}
