use async_trait::async_trait;
use crate::domain::{DomainError, NewTask, Task, TaskFilter, TaskId, TaskUpdate};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("Task with ID {0} not found")]
    NotFound(TaskId),
}

impl From<RepositoryError> for DomainError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => DomainError::NotFound(err.to_string()),
        }
    }
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Authoritative task collection. Implementations hand out owned copies;
/// mutations go through these methods only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn create_task(&self, task: NewTask) -> RepositoryResult<Task>;
    async fn get_task(&self, id: &TaskId) -> RepositoryResult<Task>;
    async fn list_tasks(&self, filter: &TaskFilter) -> RepositoryResult<Vec<Task>>;
    async fn update_task(&self, id: &TaskId, updates: &TaskUpdate) -> RepositoryResult<Task>;
    /// Returns whether a task was removed. Absence is not an error.
    async fn delete_task(&self, id: &TaskId) -> RepositoryResult<bool>;
    async fn mark_all_completed(&self) -> RepositoryResult<Vec<Task>>;
}
