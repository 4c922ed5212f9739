use serde::Serialize;

use super::error::AppError;
use super::pagination::PageInfo;
use crate::domain::ErrorKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessBody<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: ErrorDetail,
    /// Classification for the transport; not part of the wire body.
    #[serde(skip)]
    pub kind: ErrorKind,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        ErrorBody {
            success: false,
            error: ErrorDetail {
                message: err.to_string(),
                code: err.code(),
                details: err.details().map(<[String]>::to_vec),
            },
            kind: err.kind(),
        }
    }
}

/// Envelope returned by every operation. The `success` flag in each body
/// discriminates the variants on the wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Response<T> {
    Success(SuccessBody<T>),
    Error(ErrorBody),
}

impl<T> Response<T> {
    pub fn success(data: T) -> Self {
        Response::Success(SuccessBody {
            success: true,
            data,
            page_info: None,
        })
    }

    pub fn paged(data: T, page_info: PageInfo) -> Self {
        Response::Success(SuccessBody {
            success: true,
            data,
            page_info: Some(page_info),
        })
    }

    pub fn from_error(err: &AppError) -> Self {
        Response::Error(err.into())
    }

    pub fn from_result(result: Result<Response<T>, AppError>) -> Self {
        result.unwrap_or_else(|err| Self::from_error(&err))
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Response::Success(_) => None,
            Response::Error(body) => Some(body.kind),
        }
    }
}

/// Payload of a successful delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deleted {
    pub success: bool,
    pub message: String,
}

impl Deleted {
    pub fn new() -> Self {
        Deleted {
            success: true,
            message: "Task successfully deleted".to_string(),
        }
    }
}

impl Default for Deleted {
    fn default() -> Self {
        Self::new()
    }
}

/// The delete operation answers with either the bare acknowledgement or an
/// error body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DeleteResponse {
    Deleted(Deleted),
    Error(ErrorBody),
}

impl DeleteResponse {
    pub fn from_result(result: Result<Deleted, AppError>) -> Self {
        match result {
            Ok(deleted) => DeleteResponse::Deleted(deleted),
            Err(err) => DeleteResponse::Error((&err).into()),
        }
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            DeleteResponse::Deleted(_) => None,
            DeleteResponse::Error(body) => Some(body.kind),
        }
    }
}
