use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tasksync_db::SqliteDatabase;
use tasksync_server::config::ServerConfig;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::parse();
    let db = SqliteDatabase::open(&config.db_config())?;

    let addr = config.addr();
    let listener = TcpListener::bind(addr).await?;
    info!("tasksync-server listening on http://{addr}");

    tasksync_server::serve(listener, Arc::new(db)).await?;
    Ok(())
}
