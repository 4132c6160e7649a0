//! Quire API server binary.
//!
//! Prints `{"port": N}` to stdout once bound so a supervising process can
//! discover an ephemeral port.

use std::sync::Arc;

use clap::Parser;
use quire_api::config::ApiConfig;
use quire_core::auth::RevocationRegistry;
use quire_core::notify::{DEFAULT_QUEUE_CAPACITY, QueueNotifier};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// CLI arguments for the API server. Unset values fall back to the
/// environment (see [`ApiConfig::from_env`]).
#[derive(Parser, Debug)]
#[command(name = "quire_api_server", about = "Quire API server")]
struct Args {
    /// Address to listen on (port 0 = ephemeral).
    #[arg(long, env = "BIND_ADDR")]
    bind: Option<String>,

    /// SQLite connection URL.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Maximum number of database connections in the pool.
    #[arg(long, default_value_t = 5)]
    max_connections: u32,

    /// Capacity of the registration notice queue.
    #[arg(long, default_value_t = DEFAULT_QUEUE_CAPACITY)]
    notice_queue: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Write logs to stderr so stdout is reserved for the JSON port message.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,quire_api=debug,quire_core=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    let mut config = ApiConfig::from_env();
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    info!(
        database_url = %config.database_url,
        bind = %config.bind_addr,
        max_connections = args.max_connections,
        "starting quire_api_server"
    );

    let pool = quire_core::db::connect(&config.database_url, args.max_connections).await?;

    info!("running database migrations");
    quire_api::migrate(&pool).await?;

    let shutdown = CancellationToken::new();

    let revocations = Arc::new(RevocationRegistry::new());
    let sweeper = revocations.spawn_sweep_task(config.sweep_interval, shutdown.clone());
    let (notifier, notice_worker) = QueueNotifier::spawn(args.notice_queue, shutdown.clone());

    let state = quire_api::AppState::new(pool.clone(), config.clone(), revocations, Arc::new(notifier));
    let app = quire_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    println!("{}", serde_json::json!({ "port": local_addr.port() }));
    info!(addr = %local_addr, "REST API listening");

    let result = axum::serve(listener, app)
        .with_graceful_shutdown({
            let shutdown = shutdown.clone();
            async move {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("interrupt received, shutting down"),
                    _ = shutdown.cancelled() => {}
                }
            }
        })
        .await;

    // Stop background tasks once the server has drained.
    shutdown.cancel();
    let _ = sweeper.await;
    let _ = notice_worker.await;
    pool.close().await;

    result?;
    Ok(())
}
