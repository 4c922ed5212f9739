use thiserror::Error;

/// Classification shared by every failure the service reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    NotFound,
    InvalidInput,
    DateRange,
    Server,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND_ERROR",
            ErrorKind::InvalidInput => "INVALID_INPUT_ERROR",
            ErrorKind::DateRange => "DATE_RANGE_ERROR",
            ErrorKind::Server => "SERVER_ERROR",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<String>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    DateRange(String),
}

impl DomainError {
    pub fn validation(details: Vec<String>) -> Self {
        DomainError::Validation {
            message: "ValidationError".to_string(),
            details,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Validation { .. } => ErrorKind::Validation,
            DomainError::NotFound(_) => ErrorKind::NotFound,
            DomainError::InvalidInput(_) => ErrorKind::InvalidInput,
            DomainError::DateRange(_) => ErrorKind::DateRange,
        }
    }

    /// Only validation failures carry a detail list.
    pub fn details(&self) -> Option<&[String]> {
        match self {
            DomainError::Validation { details, .. } => Some(details),
            _ => None,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
