use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{NewTask, Task, TaskFilter, TaskId, TaskUpdate};
use crate::ports::{RepositoryError, RepositoryResult, TaskRepository};

#[derive(Debug)]
struct TaskTable {
    // insertion order is list order
    tasks: Vec<Task>,
    next_id: u64,
}

impl TaskTable {
    fn position(&self, id: &TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| &task.id == id)
    }
}

/// Process-local task store.
///
/// One lock guards the whole table: reads share it, every mutation takes it
/// exclusively. Callers always receive clones, never references into the table.
#[derive(Debug)]
pub struct InMemoryTaskRepository {
    table: RwLock<TaskTable>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(TaskTable {
                tasks: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn create_task(&self, task: NewTask) -> RepositoryResult<Task> {
        let mut table = self.table.write().await;

        let id = TaskId(table.next_id.to_string());
        table.next_id += 1;

        let task = Task {
            id,
            title: task.title,
            description: task.description,
            due_date: task.due_date,
            completed: false,
        };
        table.tasks.push(task.clone());

        tracing::debug!("Stored task {}", task.id);
        Ok(task)
    }

    async fn get_task(&self, id: &TaskId) -> RepositoryResult<Task> {
        let table = self.table.read().await;
        table
            .tasks
            .iter()
            .find(|task| &task.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> RepositoryResult<Vec<Task>> {
        let table = self.table.read().await;
        Ok(table
            .tasks
            .iter()
            .filter(|task| task.matches(filter))
            .cloned()
            .collect())
    }

    async fn update_task(&self, id: &TaskId, updates: &TaskUpdate) -> RepositoryResult<Task> {
        let mut table = self.table.write().await;
        let index = table
            .position(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;

        let task = &mut table.tasks[index];
        task.apply(updates);

        tracing::debug!("Updated task {}", id);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &TaskId) -> RepositoryResult<bool> {
        let mut table = self.table.write().await;
        match table.position(id) {
            Some(index) => {
                table.tasks.remove(index);
                tracing::debug!("Removed task {}", id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_completed(&self) -> RepositoryResult<Vec<Task>> {
        let mut table = self.table.write().await;
        for task in table.tasks.iter_mut() {
            task.completed = true;
        }

        tracing::debug!("Marked {} tasks completed", table.tasks.len());
        Ok(table.tasks.clone())
    }
}
