//! Optimistic task mutations.
//!
//! Every user intent runs as three phases against the shared [`TaskStore`]:
//! an optimistic phase applied before the remote call is issued, the awaited
//! remote call, and then exactly one corrective phase (confirm or rollback).
//! The phases are plain functions over the store, applied under its lock,
//! which is never held across the remote call.
//!
//! Operations do not block each other. Two toggles of the same id that are in
//! flight together can interleave their corrective phases and leave
//! `completed` at a value neither would produce alone; this race is accepted.
//! There is no cancellation: once issued, a call's corrective phase always
//! applies.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use tasksync_core::task::{CreateTask, Task, TaskInput};
use tasksync_core::ValidationError;
use tasksync_service::{ServiceError, TaskService};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::ids::LocalIds;
use crate::seed;
use crate::store::TaskStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("task not found: {0}")]
    NotFound(String),

    #[error("remote call failed: {0}")]
    Remote(#[from] ServiceError),
}

/// Where the list shown after a successful `refresh` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSource {
    Remote,
    /// The remote list was empty, so the fallback seed is shown.
    Seed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Canonical record returned by the remote store.
    Remote,
    /// Built locally after the remote create failed. It is never reconciled
    /// with the remote store.
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub task: Task,
    pub origin: Origin,
}

pub struct MutationDispatcher {
    service: Arc<dyn TaskService>,
    store: Arc<Mutex<TaskStore>>,
    seed: Vec<Task>,
    ids: LocalIds,
}

impl MutationDispatcher {
    /// One dispatcher per client session, over the session's store.
    pub fn new(service: Arc<dyn TaskService>, store: Arc<Mutex<TaskStore>>) -> Self {
        Self {
            service,
            store,
            seed: seed::fallback_tasks(),
            ids: LocalIds::new(),
        }
    }

    /// Replace the built-in fallback list.
    pub fn with_seed(mut self, seed: Vec<Task>) -> Self {
        self.seed = seed;
        self
    }

    /// A copy of the store as it is right now.
    pub fn snapshot(&self) -> TaskStore {
        self.apply(|store| store.clone())
    }

    fn apply<R>(&self, phase: impl FnOnce(&mut TaskStore) -> R) -> R {
        // store mutations are total, so a poisoned lock still holds a usable store
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        phase(&mut store)
    }

    /// Reload the whole list.
    ///
    /// On failure the store shows the fallback seed and records the error;
    /// the `Err` is informational, the store is already consistent. An empty
    /// remote list also shows the seed, without an error.
    pub async fn refresh(&self) -> Result<ListSource, SyncError> {
        self.apply(begin_loading);
        let result = self.service.list_tasks().await;
        match result {
            Ok(tasks) if tasks.is_empty() => {
                debug!("remote list empty, showing fallback tasks");
                self.apply(|store| finish_refresh(store, self.seed.clone(), None));
                Ok(ListSource::Seed)
            }
            Ok(tasks) => {
                debug!(count = tasks.len(), "refreshed from remote");
                self.apply(|store| finish_refresh(store, tasks, None));
                Ok(ListSource::Remote)
            }
            Err(e) => {
                warn!("refresh failed, showing fallback tasks: {e}");
                let message = format!("Failed to fetch tasks: {e}");
                self.apply(|store| finish_refresh(store, self.seed.clone(), Some(message)));
                Err(e.into())
            }
        }
    }

    /// Create a task. Nothing is inserted until the remote call resolves,
    /// since the remote store assigns identity. If the call fails, a local
    /// task is inserted in its place, so the only `Err` is a validation
    /// failure caught before any call is made.
    pub async fn create(&self, input: TaskInput) -> Result<Created, SyncError> {
        if let Err(e) = input.validate() {
            let err = SyncError::from(e);
            self.apply(|store| store.set_error(Some(err.to_string())));
            return Err(err);
        }

        self.apply(begin_loading);
        let created = match self.service.create_task(&CreateTask::from(&input)).await {
            Ok(task) => {
                info!(id = %task.id, "task created");
                Created {
                    task,
                    origin: Origin::Remote,
                }
            }
            Err(e) => {
                let task = self.local_task(&input);
                warn!(id = %task.id, "remote create failed, keeping task locally: {e}");
                Created {
                    task,
                    origin: Origin::Local,
                }
            }
        };
        self.apply(|store| finish_create(store, &created));
        Ok(created)
    }

    /// Flip `completed` now, then confirm with the canonical record or flip
    /// it back if the remote call fails.
    pub async fn toggle(&self, id: &str) -> Result<Task, SyncError> {
        if !self.apply(|store| flip_completed(store, id)) {
            let err = SyncError::NotFound(id.to_string());
            self.apply(|store| store.set_error(Some(err.to_string())));
            return Err(err);
        }
        debug!(id, "optimistic toggle applied");

        match self.service.toggle_task(id).await {
            Ok(task) => {
                debug!(id, completed = task.completed, "toggle confirmed");
                self.apply(|store| confirm_task(store, id, task.clone()));
                Ok(task)
            }
            Err(e) => {
                warn!(id, "toggle failed, rolling back: {e}");
                let message = format!("Failed to toggle task: {e}");
                self.apply(|store| {
                    flip_completed(store, id);
                    store.set_error(Some(message));
                });
                Err(e.into())
            }
        }
    }

    /// Delete a task. The task stays visible until the remote delete
    /// succeeds; there is no undo to fall back on.
    pub async fn remove(&self, id: &str) -> Result<(), SyncError> {
        match self.service.delete_task(id).await {
            Ok(()) => {
                info!(id, "task deleted");
                self.apply(|store| store.remove_by_id(id));
                Ok(())
            }
            Err(e) => {
                warn!(id, "delete failed: {e}");
                let message = format!("Failed to delete task: {e}");
                self.apply(|store| store.set_error(Some(message)));
                Err(e.into())
            }
        }
    }

    fn local_task(&self, input: &TaskInput) -> Task {
        Task {
            id: self.ids.next(),
            title: input.title.clone(),
            description: input.description.clone(),
            priority: input.priority,
            due_date: Some(input.due_date.clone()),
            completed: false,
            created_at: Utc::now().timestamp_millis(),
        }
    }
}

fn begin_loading(store: &mut TaskStore) {
    store.set_loading(true);
    store.set_error(None);
}

fn finish_refresh(store: &mut TaskStore, tasks: Vec<Task>, error: Option<String>) {
    store.replace_all(tasks);
    store.set_error(error);
    store.set_loading(false);
}

fn finish_create(store: &mut TaskStore, created: &Created) {
    store.insert_at_front(created.task.clone());
    if created.origin == Origin::Local {
        store.set_error(Some(
            "Could not reach the server; the task was saved on this device only".into(),
        ));
    }
    store.set_loading(false);
}

/// Its own inverse: used for both the optimistic phase and the rollback.
fn flip_completed(store: &mut TaskStore, id: &str) -> bool {
    store.mutate_by_id(id, |task| task.completed = !task.completed)
}

fn confirm_task(store: &mut TaskStore, id: &str, canonical: Task) {
    store.mutate_by_id(id, |task| *task = canonical);
}
