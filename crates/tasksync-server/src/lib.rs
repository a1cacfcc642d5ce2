pub mod config;
mod routes;
#[cfg(feature = "test-helpers")]
pub mod test_helpers;

use std::sync::Arc;

use anyhow::Result;
use tasksync_db::Database;
use tasksync_service::LocalService;
use tokio::net::TcpListener;

pub use routes::build_router;

pub async fn serve(listener: TcpListener, db: Arc<dyn Database>) -> Result<()> {
    let service = LocalService::new(db);
    let app = routes::build_router(service);
    axum::serve(listener, app).await?;
    Ok(())
}
