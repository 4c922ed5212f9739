use async_trait::async_trait;

use crate::domain::{Task, TaskId};

/// Short-lived copies of single tasks, keyed by id. The store stays
/// authoritative; an entry may only be dropped early, never kept past a
/// mutation of its task.
#[async_trait]
pub trait TaskCache: Send + Sync {
    async fn get(&self, id: &TaskId) -> Option<Task>;
    async fn put(&self, task: Task);
    async fn evict(&self, id: &TaskId);
    async fn evict_all(&self);
}
