use thiserror::Error;

use crate::date::DateError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("all fields (title, description, priority, dueDate) are required; missing {0}")]
    MissingField(&'static str),

    #[error("title must not be blank")]
    BlankTitle,

    #[error("unknown priority: {0}")]
    InvalidPriority(String),

    #[error("invalid dueDate: {0}")]
    InvalidDate(#[from] DateError),
}
