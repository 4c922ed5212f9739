use super::AppResult;
use crate::domain::*;
use crate::ports::{TaskCache, TaskRepository};
use std::sync::Arc;
use tokio::sync::Mutex;

pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
    cache: Arc<dyn TaskCache>,
    // Bumped by every mutation. A read only fills the cache if no mutation
    // happened between its store read and the fill.
    generation: Mutex<u64>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository>, cache: Arc<dyn TaskCache>) -> Self {
        Self {
            repository,
            cache,
            generation: Mutex::new(0),
        }
    }

    pub async fn create_task(&self, task: NewTask) -> AppResult<Task> {
        Ok(self.repository.create_task(task).await?)
    }

    pub async fn get_task(&self, id: &TaskId) -> AppResult<Task> {
        if let Some(task) = self.cache.get(id).await {
            return Ok(task);
        }

        let seen = *self.generation.lock().await;
        let task = self.repository.get_task(id).await?;

        let generation = self.generation.lock().await;
        if *generation == seen {
            self.cache.put(task.clone()).await;
        }
        Ok(task)
    }

    pub async fn list_tasks(&self, filter: &TaskFilter) -> AppResult<Vec<Task>> {
        // Lists always hit the store; only single-task reads are cached.
        Ok(self.repository.list_tasks(filter).await?)
    }

    pub async fn update_task(&self, id: &TaskId, updates: &TaskUpdate) -> AppResult<Task> {
        let result = self.repository.update_task(id, updates).await;
        self.invalidate(Some(id)).await;
        Ok(result?)
    }

    pub async fn delete_task(&self, id: &TaskId) -> AppResult<bool> {
        let result = self.repository.delete_task(id).await;
        self.invalidate(Some(id)).await;
        Ok(result?)
    }

    pub async fn mark_all_completed(&self) -> AppResult<Vec<Task>> {
        let result = self.repository.mark_all_completed().await;
        self.invalidate(None).await;
        Ok(result?)
    }

    /// Runs after the store mutation. Evicts under the generation lock so a
    /// concurrent read cannot put back the copy it fetched before the change.
    async fn invalidate(&self, id: Option<&TaskId>) {
        let mut generation = self.generation.lock().await;
        *generation += 1;
        match id {
            Some(id) => self.cache.evict(id).await,
            None => self.cache.evict_all().await,
        }
    }
}
