//! Line-delimited JSON front end.
//!
//! Reads one request object per line and writes one reply per line. This is
//! where error kinds become status numbers; nothing below this layer knows
//! about them.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::Instrument;
use uuid::Uuid;

use crate::application::{
    AppError, CreateTaskArgs, Response, TaskArgs, TaskOperations, TasksArgs, UpdateTaskArgs,
};
use crate::domain::ErrorKind;

#[derive(Debug, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum Request {
    CreateTask(CreateTaskArgs),
    UpdateTask(UpdateTaskArgs),
    DeleteTask(TaskArgs),
    MarkAllCompleted,
    Tasks(ListRequest),
    Task(TaskArgs),
}

/// `tasks` arguments with paging left optional on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    pub completed: Option<bool>,
    pub due_date_range: Option<Vec<String>>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub status: u16,
    pub body: Value,
}

impl Reply {
    fn new<T: Serialize>(kind: Option<ErrorKind>, body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(body) => Reply {
                status: status_for(kind),
                body,
            },
            Err(e) => Self::failure(AppError::Application(e.to_string())),
        }
    }

    fn failure(err: AppError) -> Self {
        let response = Response::<()>::from_error(&err);
        Reply {
            status: status_for(Some(err.kind())),
            body: serde_json::to_value(&response).unwrap_or(Value::Null),
        }
    }
}

pub fn status_for(kind: Option<ErrorKind>) -> u16 {
    match kind {
        None => 200,
        Some(ErrorKind::Validation) => 400,
        Some(ErrorKind::NotFound) => 404,
        Some(_) => 500,
    }
}

pub struct StdioServer {
    operations: Arc<TaskOperations>,
    default_page_size: usize,
}

impl StdioServer {
    pub fn new(operations: Arc<TaskOperations>, default_page_size: usize) -> Self {
        Self {
            operations,
            default_page_size,
        }
    }

    pub async fn run<R, W>(&self, reader: R, mut writer: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let reply = self.handle_line(&line).await;
            let mut out = serde_json::to_string(&reply)?;
            out.push('\n');
            writer.write_all(out.as_bytes()).await?;
            writer.flush().await?;
        }

        tracing::info!("Input closed, shutting down");
        Ok(())
    }

    pub async fn handle_line(&self, line: &str) -> Reply {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("request", %request_id);

        async {
            match serde_json::from_str::<Request>(line) {
                Ok(request) => self.dispatch(request).await,
                Err(e) => {
                    tracing::warn!("Rejected malformed request: {}", e);
                    Reply::failure(AppError::Application(format!("Malformed request: {e}")))
                }
            }
        }
        .instrument(span)
        .await
    }

    pub async fn dispatch(&self, request: Request) -> Reply {
        tracing::debug!("Dispatching {:?}", request);
        let ops = &self.operations;

        match request {
            Request::CreateTask(args) => {
                let response = ops.create_task(args).await;
                Reply::new(response.error_kind(), &response)
            }
            Request::UpdateTask(args) => {
                let response = ops.update_task(args).await;
                Reply::new(response.error_kind(), &response)
            }
            Request::DeleteTask(args) => {
                let response = ops.delete_task(args).await;
                Reply::new(response.error_kind(), &response)
            }
            Request::MarkAllCompleted => {
                let response = ops.mark_all_completed().await;
                Reply::new(response.error_kind(), &response)
            }
            Request::Tasks(list) => {
                let response = ops.tasks(self.list_args(list)).await;
                Reply::new(response.error_kind(), &response)
            }
            Request::Task(args) => {
                let response = ops.task(args).await;
                Reply::new(response.error_kind(), &response)
            }
        }
    }

    fn list_args(&self, list: ListRequest) -> TasksArgs {
        let default_page_size = i64::try_from(self.default_page_size).unwrap_or(i64::MAX);
        TasksArgs {
            completed: list.completed,
            due_date_range: list.due_date_range,
            page: list.page.unwrap_or(1),
            page_size: list.page_size.unwrap_or(default_page_size),
        }
    }
}
