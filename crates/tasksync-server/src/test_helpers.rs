use std::sync::Arc;

use axum::Router;
use tasksync_service::LocalService;
use tokio::net::TcpListener;

/// Build a test router over an in-memory SQLite database.
pub fn test_router() -> Router {
    let db = Arc::new(tasksync_db::SqliteDatabase::open_in_memory().unwrap());
    crate::routes::build_router(LocalService::new(db))
}

/// A running test server with base_url and background task handle.
pub struct TestServer {
    pub base_url: String,
    _handle: tokio::task::JoinHandle<()>,
}

/// Spawn an axum test server on a random port. Returns the TestServer
/// with the `base_url` (e.g. "http://127.0.0.1:12345").
pub async fn spawn_test_server() -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{addr}");
    let app = test_router();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    TestServer {
        base_url,
        _handle: handle,
    }
}
