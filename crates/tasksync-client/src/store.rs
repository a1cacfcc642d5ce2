use tasksync_core::task::Task;

/// Which slice of the list a view shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TaskFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Pending => !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

/// The client's current view of all tasks, newest first, plus a loading
/// flag and the last recorded error.
///
/// The loading flag is a single shared value: when operations overlap, the
/// first one to finish clears it while the others are still in flight.
///
/// Every mutation is synchronous and total. Only creation (`insert_at_front`),
/// deletion (`remove_by_id`) and `replace_all` change the order; updates made
/// through `mutate_by_id` keep the task where it is.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    loading: bool,
    error: Option<String>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub fn insert_at_front(&mut self, task: Task) {
        self.tasks.insert(0, task);
    }

    pub fn remove_by_id(&mut self, id: &str) {
        self.tasks.retain(|t| t.id != id);
    }

    /// Apply `f` to the task with this id in place. Returns whether a task
    /// was found; an unknown id is a no-op.
    pub fn mutate_by_id<F>(&mut self, id: &str, f: F) -> bool
    where
        F: FnOnce(&mut Task),
    {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                f(task);
                true
            }
            None => false,
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Tasks matching `filter`, in store order.
    pub fn filtered(&self, filter: TaskFilter) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| filter.matches(t))
    }

    pub fn stats(&self) -> TaskStats {
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        TaskStats {
            total: self.tasks.len(),
            completed,
            pending: self.tasks.len() - completed,
        }
    }
}
