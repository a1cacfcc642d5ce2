use async_trait::async_trait;
use tasksync_core::task::{CreateTask, Task};
use tasksync_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for ServiceError {
    fn from(e: ValidationError) -> Self {
        ServiceError::InvalidInput(e.to_string())
    }
}

/// The four task operations, always in display form.
///
/// `LocalService` is the authoritative implementation over a `Database`;
/// `HttpService` reaches it over the task API. The client programs against
/// this trait and does not care which one it holds. No implementation
/// retries: each call is attempted once.
#[async_trait]
pub trait TaskService: Send + Sync {
    /// All tasks, newest first.
    async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError>;
    async fn create_task(&self, input: &CreateTask) -> Result<Task, ServiceError>;
    /// Flip `completed` and return the canonical record.
    async fn toggle_task(&self, id: &str) -> Result<Task, ServiceError>;
    /// Deleting an unknown id succeeds.
    async fn delete_task(&self, id: &str) -> Result<(), ServiceError>;
}
