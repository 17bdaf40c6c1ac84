use crate::models::{ActiveDays, Todo, TodoMap};
use crate::storage::{load_or_default, write_through, Applied, Store, StorageKey};
use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    #[default]
    All,
    Completed,
    Pending,
}

impl Filter {
    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Completed => "completed",
            Filter::Pending => "pending",
        }
    }

    pub fn matches(self, todo: &Todo) -> bool {
        match self {
            Filter::All => true,
            Filter::Completed => todo.completed,
            Filter::Pending => !todo.completed,
        }
    }
}

impl FromStr for Filter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "all" => Ok(Filter::All),
            "completed" => Ok(Filter::Completed),
            "pending" => Ok(Filter::Pending),
            other => Err(format!("unknown filter {other:?}; expected all, completed or pending")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateGroup {
    pub date: String,
    pub todos: Vec<Todo>,
}

/// Buckets todos by their `date`, newest date first. Within a group the
/// input order is kept.
pub fn group_by_date(todos: impl IntoIterator<Item = Todo>) -> Vec<DateGroup> {
    let mut groups: Vec<DateGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for todo in todos {
        match index.get(&todo.date) {
            Some(&slot) => groups[slot].todos.push(todo),
            None => {
                index.insert(todo.date.clone(), groups.len());
                groups.push(DateGroup {
                    date: todo.date.clone(),
                    todos: vec![todo],
                });
            }
        }
    }

    // YYYY-MM-DD sorts chronologically as plain text
    groups.sort_by(|a, b| b.date.cmp(&a.date));
    groups
}

/// Read-mostly view over every todo ever logged, plus the activity summary.
pub struct TaskHistory {
    store: Arc<dyn Store>,
    todos: TodoMap,
    active_days: ActiveDays,
}

impl TaskHistory {
    pub fn mount(store: Arc<dyn Store>) -> Self {
        let todos = load_or_default(store.as_ref(), StorageKey::Todos);
        let active_days = load_or_default(store.as_ref(), StorageKey::ActiveDays);
        Self {
            store,
            todos,
            active_days,
        }
    }

    /// Every todo tagged with the bucket it lives in, newest date first.
    pub fn flatten(&self) -> Vec<Todo> {
        let mut all: Vec<Todo> = self
            .todos
            .iter()
            .flat_map(|(date, bucket)| {
                bucket.iter().map(move |todo| Todo {
                    date: date.clone(),
                    ..todo.clone()
                })
            })
            .collect();
        all.sort_by(|a, b| b.date.cmp(&a.date));
        all
    }

    pub fn view(&self, filter: Filter) -> Vec<DateGroup> {
        group_by_date(self.flatten().into_iter().filter(|todo| filter.matches(todo)))
    }

    /// Flips the todo `id` in the bucket for `date`.
    pub fn toggle(&mut self, id: &str, date: &str) -> Applied<Option<bool>> {
        let Some(todo) = self
            .todos
            .get_mut(date)
            .and_then(|bucket| bucket.iter_mut().find(|todo| todo.id == id))
        else {
            return Applied::clean(None);
        };
        todo.completed = !todo.completed;
        let completed = todo.completed;
        info!(date, id, completed, "toggled todo from history");

        let warning = write_through(self.store.as_ref(), StorageKey::Todos, &self.todos);
        Applied::with_warning(Some(completed), warning)
    }

    pub fn active_days(&self) -> Vec<String> {
        self.active_days.newest_first()
    }

    pub fn active_day_count(&self) -> usize {
        self.active_days.len()
    }
}
