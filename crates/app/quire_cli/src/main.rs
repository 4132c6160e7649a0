// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use clap::Parser;
use cli::{Cli, Commands};
use quire_core::models::Role;
use quire_core::store::identities;

mod cli;
mod logging;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    logging::init()?;

    let args = Cli::parse();

    match &args.command {
        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Commands::Migrate { database_url } => {
            block_on(migrate(database_url))?;
        }
        Commands::Promote {
            database_url,
            username,
            role,
        } => {
            block_on(promote(database_url, username, *role))?;
        }
    }

    Ok(())
}

fn block_on<F: std::future::Future<Output = Result<()>>>(future: F) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(future)
}

async fn migrate(database_url: &str) -> Result<()> {
    let pool = quire_core::db::connect(database_url, 1).await?;
    quire_core::db::migrate(&pool).await?;
    pool.close().await;
    log::info!("migrations applied to {database_url}");
    Ok(())
}

async fn promote(database_url: &str, username: &str, role: Role) -> Result<()> {
    let pool = quire_core::db::connect(database_url, 1).await?;
    quire_core::db::migrate(&pool).await?;

    let user = identities::find_by_username(&pool, username)
        .await?
        .ok_or_else(|| Error::Custom(format!("no user named '{username}'")))?;
    let coordinator = quire_core::coordinator::Coordinator::new(pool.clone());
    let updated = coordinator.set_role(user.id, role).await?;
    pool.close().await;

    log::info!("{} is now {}", updated.username, updated.role);
    Ok(())
}
