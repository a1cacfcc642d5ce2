pub mod api;
pub mod date;
pub mod error;
pub mod task;

pub use api::Envelope;
pub use error::ValidationError;
pub use task::{CreateTask, NewTask, Priority, StoredTask, Task, TaskInput};
