use tasksync_core::task::{Priority, Task};

/// Shown by `refresh` when the remote list is unavailable or empty, newest
/// first.
pub fn fallback_tasks() -> Vec<Task> {
    vec![
        Task {
            id: "seed-3".into(),
            title: "Update documentation".into(),
            description: "Review and update the project documentation with recent changes".into(),
            priority: Priority::Low,
            due_date: None,
            completed: false,
            created_at: 1_710_633_600_000,
        },
        Task {
            id: "seed-2".into(),
            title: "Schedule team meeting".into(),
            description: "Coordinate with everyone to find a suitable time next week".into(),
            priority: Priority::Medium,
            due_date: None,
            completed: false,
            created_at: 1_710_547_200_000,
        },
        Task {
            id: "seed-1".into(),
            title: "Complete project proposal".into(),
            description: "Finish the draft and send it to the team for review by Friday".into(),
            priority: Priority::High,
            due_date: None,
            completed: true,
            created_at: 1_710_460_800_000,
        },
    ]
}
