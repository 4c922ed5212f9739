use crate::domain::{DomainError, ErrorKind};
use crate::ports::RepositoryError;
use super::pagination::PaginationError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Pagination(#[from] PaginationError),

    #[error("{0}")]
    Application(String),
}

impl AppError {
    /// Store misses keep their taxonomy kind; everything outside the
    /// taxonomy is a server error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Domain(err) => err.kind(),
            AppError::Repository(RepositoryError::NotFound(_)) => ErrorKind::NotFound,
            AppError::Pagination(_) | AppError::Application(_) => ErrorKind::Server,
        }
    }

    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    pub fn details(&self) -> Option<&[String]> {
        match self {
            AppError::Domain(err) => err.details(),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
