//! Named operations exposed to the transport.
//!
//! Each operation validates its arguments, calls into the [`TaskService`],
//! and renders the outcome into an envelope. Failures are never recovered
//! from here; they are classified and returned as error bodies.

use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

use super::error::{AppError, AppResult};
use super::pagination::paginate;
use super::response::{DeleteResponse, Deleted, Response};
use super::task_service::TaskService;
use crate::domain::{
    validate_get_tasks, validate_task_create_input, validate_task_id, validate_task_update_input,
    CreateTaskInput, Task, TaskFilter, UpdateTaskInput,
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTaskArgs {
    #[serde(default)]
    pub input: CreateTaskInput,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTaskArgs {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub input: UpdateTaskInput,
}

/// Arguments of `task` and `deleteTask`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskArgs {
    #[serde(default)]
    pub id: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TasksArgs {
    pub completed: Option<bool>,
    pub due_date_range: Option<Vec<String>>,
    pub page: i64,
    pub page_size: i64,
}

pub struct TaskOperations {
    service: Arc<TaskService>,
}

impl TaskOperations {
    pub fn new(service: Arc<TaskService>) -> Self {
        Self { service }
    }

    pub async fn create_task(&self, args: CreateTaskArgs) -> Response<Task> {
        finish("createTask", self.try_create_task(args).await)
    }

    pub async fn update_task(&self, args: UpdateTaskArgs) -> Response<Task> {
        finish("updateTask", self.try_update_task(args).await)
    }

    pub async fn delete_task(&self, args: TaskArgs) -> DeleteResponse {
        let result = self.try_delete_task(args).await;
        if let Err(err) = &result {
            log_failure("deleteTask", err);
        }
        DeleteResponse::from_result(result)
    }

    pub async fn mark_all_completed(&self) -> Response<Vec<Task>> {
        finish("markAllCompleted", self.try_mark_all_completed().await)
    }

    pub async fn tasks(&self, args: TasksArgs) -> Response<Vec<Task>> {
        finish("tasks", self.try_tasks(args).await)
    }

    pub async fn task(&self, args: TaskArgs) -> Response<Task> {
        finish("task", self.try_task(args).await)
    }

    async fn try_create_task(&self, args: CreateTaskArgs) -> AppResult<Response<Task>> {
        let new_task = validate_task_create_input(&args.input)?;
        let task = self.service.create_task(new_task).await?;
        info!("Created task {}", task.id);
        Ok(Response::success(task))
    }

    async fn try_update_task(&self, args: UpdateTaskArgs) -> AppResult<Response<Task>> {
        let id = validate_task_id(args.id.as_ref())?;
        let updates = validate_task_update_input(&args.input)?;
        let task = self.service.update_task(&id, &updates).await?;
        info!("Updated task {}", task.id);
        Ok(Response::success(task))
    }

    async fn try_delete_task(&self, args: TaskArgs) -> AppResult<Deleted> {
        let id = validate_task_id(args.id.as_ref())?;
        if !self.service.delete_task(&id).await? {
            return Err(AppError::Application("Task not found".to_string()));
        }
        info!("Deleted task {}", id);
        Ok(Deleted::new())
    }

    async fn try_mark_all_completed(&self) -> AppResult<Response<Vec<Task>>> {
        let tasks = self.service.mark_all_completed().await?;
        info!("Marked {} tasks completed", tasks.len());
        Ok(Response::success(tasks))
    }

    async fn try_tasks(&self, args: TasksArgs) -> AppResult<Response<Vec<Task>>> {
        let due_date_range = validate_get_tasks(args.completed, args.due_date_range.as_deref())?;
        if args.page < 1 || args.page_size < 1 {
            return Err(AppError::Application(
                "Page and pageSize must be greater than 0".to_string(),
            ));
        }

        let filter = TaskFilter {
            completed: args.completed,
            due_date_range,
        };
        let tasks = self.service.list_tasks(&filter).await?;
        let page = paginate(&tasks, to_usize(args.page), to_usize(args.page_size))?;
        Ok(Response::paged(page.data, page.info))
    }

    async fn try_task(&self, args: TaskArgs) -> AppResult<Response<Task>> {
        let id = validate_task_id(args.id.as_ref())?;
        let task = self.service.get_task(&id).await?;
        Ok(Response::success(task))
    }
}

fn finish<T>(operation: &str, result: AppResult<Response<T>>) -> Response<T> {
    if let Err(err) = &result {
        log_failure(operation, err);
    }
    Response::from_result(result)
}

fn log_failure(operation: &str, err: &AppError) {
    warn!(operation, code = err.code(), "{}", err);
}

// Callers have already rejected values below 1.
fn to_usize(n: i64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::MokaTaskCache;
    use crate::adapters::memory::InMemoryTaskRepository;
    use crate::application::response::SuccessBody;
    use crate::domain::ErrorKind;
    use serde_json::json;
    use std::time::Duration;

    fn operations() -> TaskOperations {
        let service = TaskService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::new(MokaTaskCache::new(Duration::from_secs(60), 100)),
        );
        TaskOperations::new(Arc::new(service))
    }

    fn create_args(title: &str, due_date: &str) -> CreateTaskArgs {
        CreateTaskArgs {
            input: CreateTaskInput {
                title: Some(title.to_string()),
                description: Some("Description".to_string()),
                due_date: Some(due_date.to_string()),
                completed: Some(true),
            },
        }
    }

    fn list_args(page: i64, page_size: i64) -> TasksArgs {
        TasksArgs {
            completed: None,
            due_date_range: None,
            page,
            page_size,
        }
    }

    fn id_args(id: &str) -> TaskArgs {
        TaskArgs { id: Some(json!(id)) }
    }

    fn unwrap_success<T>(response: Response<T>) -> SuccessBody<T> {
        match response {
            Response::Success(body) => body,
            Response::Error(body) => panic!("expected success, got {:?}", body.error),
        }
    }

    async fn seed(ops: &TaskOperations, dates: &[&str]) -> Vec<Task> {
        let mut created = Vec::new();
        for (n, date) in dates.iter().enumerate() {
            let response = ops.create_task(create_args(&format!("Task {}", n + 1), date)).await;
            created.push(unwrap_success(response).data);
        }
        created
    }

    #[tokio::test]
    async fn create_forces_incomplete_and_unique_ids() {
        let ops = operations();
        let tasks = seed(&ops, &["2022-01-01T00:00:00Z", "2022-01-02T00:00:00Z"]).await;

        assert!(tasks.iter().all(|t| !t.completed));
        assert_ne!(tasks[0].id, tasks[1].id);
    }

    #[tokio::test]
    async fn create_with_invalid_input_is_a_validation_error() {
        let ops = operations();
        let response = ops.create_task(create_args("", "2024-01-01T00:00:00Z")).await;

        assert_eq!(response.error_kind(), Some(ErrorKind::Validation));
        assert_eq!(
            serde_json::to_value(&response).unwrap()["error"]["details"],
            json!(["Title is required."])
        );
    }

    #[tokio::test]
    async fn task_returns_created_record() {
        let ops = operations();
        let created = seed(&ops, &["2022-01-01T00:00:00Z"]).await.remove(0);

        let found = unwrap_success(ops.task(id_args(&created.id.0)).await).data;
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn task_with_unknown_id_is_not_found() {
        let ops = operations();
        let response = ops.task(id_args("42")).await;

        assert_eq!(response.error_kind(), Some(ErrorKind::NotFound));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": false,
                "error": { "message": "Task with ID 42 not found", "code": "NOT_FOUND_ERROR" }
            })
        );
    }

    #[tokio::test]
    async fn task_with_numeric_id_is_invalid_input() {
        let ops = operations();
        let response = ops.task(TaskArgs { id: Some(json!(1)) }).await;
        assert_eq!(response.error_kind(), Some(ErrorKind::InvalidInput));

        let response = ops.task(TaskArgs::default()).await;
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"]["message"], "Task ID is required.");
        assert_eq!(json["error"]["code"], "INVALID_INPUT_ERROR");
    }

    #[tokio::test]
    async fn update_changes_only_supplied_fields() {
        let ops = operations();
        let created = seed(&ops, &["2022-01-01T00:00:00Z"]).await.remove(0);

        let updated = unwrap_success(
            ops.update_task(UpdateTaskArgs {
                id: Some(json!(created.id.0)),
                input: UpdateTaskInput {
                    completed: Some(true),
                    ..Default::default()
                },
            })
            .await,
        )
        .data;

        assert!(updated.completed);
        assert_eq!(updated.title, created.title);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.due_date, created.due_date);

        let fetched = unwrap_success(ops.task(id_args(&created.id.0)).await).data;
        assert_eq!(fetched, updated);
    }

    #[tokio::test]
    async fn update_validates_before_touching_the_store() {
        let ops = operations();
        let response = ops
            .update_task(UpdateTaskArgs {
                id: Some(json!("99")),
                input: UpdateTaskInput {
                    due_date: Some("invalid".to_string()),
                    ..Default::default()
                },
            })
            .await;
        assert_eq!(response.error_kind(), Some(ErrorKind::Validation));

        let response = ops
            .update_task(UpdateTaskArgs {
                id: Some(json!("99")),
                input: UpdateTaskInput::default(),
            })
            .await;
        assert_eq!(response.error_kind(), Some(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn delete_then_lookup_is_not_found() {
        let ops = operations();
        let created = seed(&ops, &["2022-01-01T00:00:00Z"]).await.remove(0);

        let deleted = ops.delete_task(id_args(&created.id.0)).await;
        assert_eq!(
            serde_json::to_value(&deleted).unwrap(),
            json!({ "success": true, "message": "Task successfully deleted" })
        );

        let response = ops.task(id_args(&created.id.0)).await;
        assert_eq!(response.error_kind(), Some(ErrorKind::NotFound));
    }

    #[tokio::test]
    async fn delete_of_missing_task_is_a_server_error() {
        let ops = operations();
        let response = ops.delete_task(id_args("5")).await;
        assert_eq!(response.error_kind(), Some(ErrorKind::Server));
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "success": false,
                "error": { "message": "Task not found", "code": "SERVER_ERROR" }
            })
        );
    }

    #[tokio::test]
    async fn mark_all_completed_then_filter_returns_everything_in_order() {
        let ops = operations();
        let created = seed(
            &ops,
            &["2022-01-03T00:00:00Z", "2022-01-01T00:00:00Z", "2022-01-02T00:00:00Z"],
        )
        .await;

        let all = unwrap_success(ops.mark_all_completed().await).data;
        assert!(all.iter().all(|t| t.completed));

        let listed = unwrap_success(
            ops.tasks(TasksArgs {
                completed: Some(true),
                ..list_args(1, 10)
            })
            .await,
        )
        .data;
        let ids: Vec<_> = listed.iter().map(|t| t.id.clone()).collect();
        let expected: Vec<_> = created.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn tasks_paginates_filtered_results() {
        let ops = operations();
        seed(
            &ops,
            &[
                "2022-01-01T00:00:00Z",
                "2022-01-02T00:00:00Z",
                "2022-01-03T00:00:00Z",
                "2022-01-04T00:00:00Z",
                "2022-01-05T00:00:00Z",
            ],
        )
        .await;

        let json = serde_json::to_value(ops.tasks(list_args(2, 2)).await).unwrap();
        assert_eq!(json["data"][0]["title"], "Task 3");
        assert_eq!(json["data"][1]["title"], "Task 4");
        assert_eq!(
            json["pageInfo"],
            json!({ "currentPage": 2, "totalPages": 3, "totalItems": 5 })
        );
    }

    #[tokio::test]
    async fn tasks_range_filter_includes_boundaries() {
        let ops = operations();
        seed(
            &ops,
            &["2022-01-01T00:00:00Z", "2022-01-02T00:00:00Z", "2022-01-03T00:00:00Z"],
        )
        .await;

        let body = unwrap_success(
            ops.tasks(TasksArgs {
                due_date_range: Some(vec![
                    "2022-01-02T00:00:00Z".to_string(),
                    "2022-01-03T00:00:00Z".to_string(),
                ]),
                ..list_args(1, 10)
            })
            .await,
        );
        let titles: Vec<_> = body.data.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Task 2", "Task 3"]);
        assert_eq!(body.page_info.map(|info| info.total_items), Some(2));
    }

    #[tokio::test]
    async fn tasks_rejects_inverted_range() {
        let ops = operations();
        let response = ops
            .tasks(TasksArgs {
                completed: Some(false),
                due_date_range: Some(vec![
                    "2022-02-01T00:00:00Z".to_string(),
                    "2021-01-01T00:00:00Z".to_string(),
                ]),
                ..list_args(1, 10)
            })
            .await;

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"]["code"], "DATE_RANGE_ERROR");
        assert_eq!(json["error"]["message"], "Start date must be earlier than end date.");
    }

    #[tokio::test]
    async fn tasks_rejects_non_positive_paging() {
        let ops = operations();
        for (page, page_size) in [(0, 10), (1, 0), (-1, 5)] {
            let json = serde_json::to_value(ops.tasks(list_args(page, page_size)).await).unwrap();
            assert_eq!(json["error"]["code"], "SERVER_ERROR");
            assert_eq!(json["error"]["message"], "Page and pageSize must be greater than 0");
        }
    }

    #[tokio::test]
    async fn tasks_past_the_last_page_fails() {
        let ops = operations();
        seed(&ops, &["2022-01-01T00:00:00Z", "2022-01-02T00:00:00Z"]).await;

        let json = serde_json::to_value(ops.tasks(list_args(10, 2)).await).unwrap();
        assert_eq!(json["error"]["message"], "Page exceeds available data");
        assert_eq!(json["error"]["code"], "SERVER_ERROR");
    }

    #[tokio::test]
    async fn tasks_on_empty_store_is_an_empty_page() {
        let ops = operations();
        let json = serde_json::to_value(ops.tasks(list_args(1, 10)).await).unwrap();
        assert_eq!(
            json,
            json!({
                "success": true,
                "data": [],
                "pageInfo": { "currentPage": 1, "totalPages": 0, "totalItems": 0 }
            })
        );
    }
}
