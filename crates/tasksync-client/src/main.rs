use std::sync::{Arc, Mutex};

use anyhow::Result;
use clap::Parser;
use tasksync_client::config::{ClientConfig, Command};
use tasksync_client::{MutationDispatcher, Origin, TaskFilter, TaskStore};
use tasksync_core::task::{Task, TaskInput};
use tasksync_service::HttpService;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the task list, so logs go to stderr and stay quiet by default
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let config = ClientConfig::parse();
    debug!("server: {}", config.server_url);

    let service = Arc::new(HttpService::with_timeout(
        &config.server_url,
        config.request_timeout(),
    )?);
    let store = Arc::new(Mutex::new(TaskStore::new()));
    let dispatcher = MutationDispatcher::new(service, store);

    // a failed refresh already shows the fallback list and records the error
    let _ = dispatcher.refresh().await;

    match config.command() {
        Command::List { filter } => print_list(&dispatcher.snapshot(), filter),
        Command::Add {
            title,
            description,
            priority,
            due,
        } => {
            let input = TaskInput {
                title,
                description,
                priority,
                due_date: due,
            };
            if let Ok(created) = dispatcher.create(input).await {
                let origin = match created.origin {
                    Origin::Remote => "created",
                    Origin::Local => "saved locally",
                };
                println!(
                    "{origin} ({} priority): {}",
                    created.task.priority,
                    format_task(&created.task)
                );
            }
        }
        Command::Toggle { id } => {
            if let Ok(task) = dispatcher.toggle(&id).await {
                println!("{}", format_task(&task));
            }
        }
        Command::Delete { id } => {
            if dispatcher.remove(&id).await.is_ok() {
                println!("deleted {id}");
            }
        }
        Command::Stats => {
            let stats = dispatcher.snapshot().stats();
            println!(
                "total: {}  completed: {}  pending: {}",
                stats.total, stats.completed, stats.pending
            );
        }
    }

    if let Some(error) = dispatcher.snapshot().error() {
        eprintln!("error: {error}");
    }
    Ok(())
}

fn print_list(store: &TaskStore, filter: TaskFilter) {
    let mut shown = 0;
    for task in store.filtered(filter) {
        println!("{}", format_task(task));
        shown += 1;
    }
    if shown == 0 {
        println!("no tasks");
    }
}

fn format_task(task: &Task) -> String {
    let check = if task.completed { "x" } else { " " };
    let due = task.due_date.as_deref().unwrap_or("--/--/----");
    format!(
        "[{check}] {:<2} {}  (due {due})  {}",
        task.priority.symbol(),
        task.title,
        task.id
    )
}
