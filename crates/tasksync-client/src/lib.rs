pub mod config;
pub mod dispatcher;
pub mod ids;
#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;
pub mod seed;
pub mod store;

pub use dispatcher::{Created, ListSource, MutationDispatcher, Origin, SyncError};
pub use store::{TaskFilter, TaskStats, TaskStore};
