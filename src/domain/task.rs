use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
    pub completed: bool,
}

impl Task {
    /// Merge the fields present in `update` into this record.
    pub fn apply(&mut self, update: &TaskUpdate) {
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
    }

    pub fn matches(&self, filter: &TaskFilter) -> bool {
        let completed_ok = filter
            .completed
            .map(|completed| self.completed == completed)
            .unwrap_or(true);
        let due_ok = filter
            .due_date_range
            .as_ref()
            .map(|range| range.contains(&self.due_date))
            .unwrap_or(true);

        completed_ok && due_ok
    }
}

/// A validated creation request. The store assigns the id and forces `completed = false`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub due_date: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}

/// Inclusive due-date window. Construct through validation so `start <= end` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueDateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DueDateRange {
    pub fn contains(&self, due: &DateTime<Utc>) -> bool {
        self.start <= *due && *due <= self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub completed: Option<bool>,
    pub due_date_range: Option<DueDateRange>,
}
