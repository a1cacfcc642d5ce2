use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use tasksync_core::task::{CreateTask, Task};
use tasksync_service::{ServiceError, TaskService};
use tokio::sync::Notify;

/// A scriptable in-memory `TaskService` for exercising the dispatcher.
///
/// It can be switched to fail every call, and it can hold every call at a
/// gate until the test releases it, which makes the optimistic phase
/// observable.
#[derive(Default)]
pub struct MockService {
    tasks: Mutex<Vec<Task>>,
    failing: AtomicBool,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
    created: AtomicUsize,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            ..Self::default()
        }
    }

    /// Every call fails with an internal error.
    pub fn failing() -> Self {
        let mock = Self::default();
        mock.set_failing(true);
        mock
    }

    /// Hold each call until `gate` is notified once for it.
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Takes effect for calls that pass the gate after this point.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of calls issued so far, including ones still held at the gate.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Task>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn enter(&self) -> Result<(), ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.failing.load(Ordering::SeqCst) {
            Err(ServiceError::Internal("mock failure".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl TaskService for MockService {
    async fn list_tasks(&self) -> Result<Vec<Task>, ServiceError> {
        self.enter().await?;
        Ok(self.tasks())
    }

    async fn create_task(&self, input: &CreateTask) -> Result<Task, ServiceError> {
        self.enter().await?;
        let new_task = input.validate()?;
        let n = self.created.fetch_add(1, Ordering::SeqCst) + 1;
        let task = Task {
            id: format!("remote-{n}"),
            title: new_task.title,
            description: new_task.description,
            priority: new_task.priority,
            due_date: input.due_date.clone(),
            completed: false,
            created_at: n as i64,
        };
        self.lock().insert(0, task.clone());
        Ok(task)
    }

    async fn toggle_task(&self, id: &str) -> Result<Task, ServiceError> {
        self.enter().await?;
        let mut tasks = self.lock();
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ServiceError::NotFound(format!("task {id}")))?;
        task.completed = !task.completed;
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &str) -> Result<(), ServiceError> {
        self.enter().await?;
        self.lock().retain(|t| t.id != id);
        Ok(())
    }
}
