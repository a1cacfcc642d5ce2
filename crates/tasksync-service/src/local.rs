use std::sync::Arc;

use async_trait::async_trait;
use tasksync_core::task::{CreateTask, Task};
use tasksync_db::{Database, DbError};
use tracing::{debug, info, warn};

use crate::{ServiceError, TaskService};

/// The authoritative task store: validates create payloads, converts due
/// dates between display and storage form, and hands identity and ordering
/// to the database.
#[derive(Clone)]
pub struct LocalService {
    db: Arc<dyn Database>,
}

impl LocalService {
    pub fn new(db: Arc<dyn Database>) -> Self {
        Self { db }
    }
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound(msg) => ServiceError::NotFound(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

#[async_trait]
impl TaskService for LocalService {
    async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        let stored = self.db.list_tasks().await?;
        Ok(stored.iter().map(|t| t.to_display()).collect())
    }

    async fn create_task(&self, input: &CreateTask) -> Result<Task, ServiceError> {
        let new_task = input.validate().map_err(|e| {
            warn!("rejected create: {e}");
            e
        })?;
        let stored = self.db.insert_task(&new_task).await?;
        info!(id = %stored.id, created_at = stored.created_at, "task created");
        Ok(stored.to_display())
    }

    async fn toggle_task(&self, id: &str) -> Result<Task, ServiceError> {
        let stored = self.db.toggle_task(id).await?;
        info!(id, completed = stored.completed, "task toggled");
        Ok(stored.to_display())
    }

    async fn delete_task(&self, id: &str) -> Result<(), ServiceError> {
        if self.db.delete_task(id).await? {
            info!(id, "task deleted");
        } else {
            debug!(id, "delete of unknown task treated as success");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasksync_core::task::Priority;
    use tasksync_db::SqliteDatabase;

    fn service() -> LocalService {
        LocalService::new(Arc::new(SqliteDatabase::open_in_memory().unwrap()))
    }

    fn buy_milk() -> CreateTask {
        CreateTask {
            title: Some("Buy milk".into()),
            description: Some("2%".into()),
            priority: Some("low".into()),
            due_date: Some("01/06/2024".into()),
        }
    }

    #[tokio::test]
    async fn create_on_empty_store() {
        let svc = service();
        let task = svc.create_task(&buy_milk()).await.unwrap();

        assert!(!task.id.is_empty());
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Low);
        assert_eq!(task.due_date.as_deref(), Some("01/06/2024"));

        let list = svc.list_tasks().await.unwrap();
        assert_eq!(list.first(), Some(&task));
    }

    #[tokio::test]
    async fn create_rejects_missing_field_without_storing() {
        let svc = service();
        let mut input = buy_milk();
        input.priority = None;

        let err = svc.create_task(&input).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
        assert!(svc.list_tasks().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_rejects_unparseable_date() {
        let svc = service();
        let mut input = buy_milk();
        input.due_date = Some("2024-06-01".into());

        let err = svc.create_task(&input).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn newest_task_is_listed_first() {
        let svc = service();
        let first = svc.create_task(&buy_milk()).await.unwrap();
        let mut second = buy_milk();
        second.title = Some("Walk dog".into());
        let second = svc.create_task(&second).await.unwrap();

        let ids: Vec<String> = svc
            .list_tasks()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, [second.id, first.id]);
    }

    #[tokio::test]
    async fn toggle_twice_restores_completion() {
        let svc = service();
        let task = svc.create_task(&buy_milk()).await.unwrap();

        let once = svc.toggle_task(&task.id).await.unwrap();
        assert!(once.completed);
        assert_eq!(once.due_date.as_deref(), Some("01/06/2024"));

        let twice = svc.toggle_task(&task.id).await.unwrap();
        assert_eq!(twice.completed, task.completed);
        assert_eq!(twice.created_at, task.created_at);
    }

    #[tokio::test]
    async fn toggle_unknown_id_is_not_found_and_changes_nothing() {
        let svc = service();
        svc.create_task(&buy_milk()).await.unwrap();
        let before = svc.list_tasks().await.unwrap();

        let err = svc.toggle_task("missing").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(svc.list_tasks().await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_unknown_id_is_a_no_op() {
        let svc = service();
        svc.create_task(&buy_milk()).await.unwrap();
        let before = svc.list_tasks().await.unwrap();

        svc.delete_task("missing").await.unwrap();
        assert_eq!(svc.list_tasks().await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_removes_task() {
        let svc = service();
        let task = svc.create_task(&buy_milk()).await.unwrap();
        svc.delete_task(&task.id).await.unwrap();
        assert!(svc.list_tasks().await.unwrap().is_empty());
    }
}
