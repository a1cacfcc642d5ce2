use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Time-based ids for tasks created locally when the remote create fails.
///
/// Ids are the current epoch millisecond, bumped past the last one handed
/// out, so two tasks created in the same millisecond still differ.
#[derive(Debug, Default)]
pub struct LocalIds {
    last: AtomicI64,
}

impl LocalIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> String {
        let now = Utc::now().timestamp_millis();
        let issue = |prev: i64| now.max(prev + 1);
        // the closure never returns None, so both arms carry the previous value
        let prev = match self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| Some(issue(prev)))
        {
            Ok(prev) | Err(prev) => prev,
        };
        format!("local-{}", issue(prev))
    }
}
