use std::time::Duration;

use clap::{Parser, Subcommand};
use tasksync_core::task::Priority;

use crate::store::TaskFilter;

#[derive(Debug, Parser)]
#[command(name = "tasksync", about = "Task list client with optimistic sync")]
pub struct ClientConfig {
    /// Server URL
    #[arg(long, env = "TASKSYNC_SERVER_URL", default_value = "http://127.0.0.1:5000")]
    pub server_url: String,

    /// Request timeout in seconds
    #[arg(long, env = "TASKSYNC_TIMEOUT", default_value = "10")]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    /// `list` when no subcommand is given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::List {
            filter: TaskFilter::All,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show tasks, newest first
    List {
        #[arg(long, value_enum, default_value_t = TaskFilter::All)]
        filter: TaskFilter,
    },
    /// Create a task
    Add {
        #[arg(long)]
        title: String,

        #[arg(long, default_value = "")]
        description: String,

        /// low, medium or high
        #[arg(long, value_parser = parse_priority, default_value = "medium")]
        priority: Priority,

        /// Due date as DD/MM/YYYY
        #[arg(long)]
        due: String,
    },
    /// Flip a task between pending and completed
    Toggle { id: String },
    /// Delete a task
    Delete { id: String },
    /// Show task counts
    Stats,
}

fn parse_priority(s: &str) -> Result<Priority, String> {
    Priority::parse_str(s).ok_or_else(|| {
        let expected: Vec<&str> = Priority::ALL.iter().map(|p| p.as_str()).collect();
        format!("unknown priority '{s}' (expected one of: {})", expected.join(", "))
    })
}
