#[cfg(feature = "sqlite")]
pub mod sqlite;

use std::path::PathBuf;

use async_trait::async_trait;
use tasksync_core::task::{NewTask, StoredTask};
use thiserror::Error;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Default)]
pub struct DbConfig {
    /// Path to the SQLite file. Defaults to `<data_dir>/tasksync.db`.
    pub sqlite_path: Option<String>,
}

/// Storage for tasks in storage form.
///
/// Implementations own identity and creation order: `insert_task` assigns the
/// id and `created_at`, and `list_tasks` returns newest first.
#[async_trait]
pub trait Database: Send + Sync {
    async fn insert_task(&self, input: &NewTask) -> Result<StoredTask, DbError>;
    async fn get_task(&self, id: &str) -> Result<StoredTask, DbError>;
    async fn list_tasks(&self) -> Result<Vec<StoredTask>, DbError>;
    /// Flip `completed` and return the updated record.
    async fn toggle_task(&self, id: &str) -> Result<StoredTask, DbError>;
    /// Returns whether a row was removed.
    async fn delete_task(&self, id: &str) -> Result<bool, DbError>;
}

pub fn data_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join("tasksync")
    } else if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home).join(".local/share/tasksync")
    } else {
        PathBuf::from(".")
    }
}
