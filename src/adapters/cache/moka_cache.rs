use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;

use crate::domain::{Task, TaskId};
use crate::ports::{AppConfig, TaskCache};

/// Bounded task cache; entries expire `ttl` after insertion.
pub struct MokaTaskCache {
    entries: Cache<TaskId, Task>,
}

impl MokaTaskCache {
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .time_to_live(ttl)
            .max_capacity(max_capacity)
            .build();

        Self { entries }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            Duration::from_secs(config.cache_ttl_seconds),
            config.cache_capacity,
        )
    }
}

#[async_trait]
impl TaskCache for MokaTaskCache {
    async fn get(&self, id: &TaskId) -> Option<Task> {
        self.entries.get(id).await
    }

    async fn put(&self, task: Task) {
        self.entries.insert(task.id.clone(), task).await;
    }

    async fn evict(&self, id: &TaskId) {
        self.entries.invalidate(id).await;
    }

    async fn evict_all(&self) {
        // Invalidated entries are unreadable immediately; reclamation is lazy.
        self.entries.invalidate_all();
    }
}
