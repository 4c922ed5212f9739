//! Input checks run before anything reaches the store.
//!
//! Each validator returns the typed value it proved valid, so callers never
//! re-parse raw strings after this point.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::error::{DomainError, DomainResult};
use super::task::{DueDateRange, NewTask, TaskId, TaskUpdate};

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

const TITLE_REQUIRED: &str = "Title is required.";
const TITLE_TOO_LONG: &str = "Title can not be more than 100 characters.";
const DESCRIPTION_TOO_LONG: &str = "Description can not be more than 500 characters.";
const DUE_DATE_REQUIRED: &str = "DueDate is required.";
const DUE_DATE_INVALID: &str = "DueDate must be a valid ISO date.";

/// Task body as received from a caller, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    /// Accepted for compatibility; new tasks always start incomplete.
    pub completed: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub completed: Option<bool>,
}

/// Parse the date-time shapes accepted anywhere a due date is supplied.
///
/// RFC 3339 values keep their offset; naive date-times and bare dates are
/// read as UTC.
pub fn parse_iso_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn is_valid_iso_date(raw: &str) -> bool {
    parse_iso_date(raw).is_some()
}

/// Ids arrive untyped from the transport. Falsy values count as missing.
pub fn validate_task_id(id: Option<&Value>) -> DomainResult<TaskId> {
    match id {
        Some(Value::String(s)) if !s.is_empty() => Ok(TaskId(s.clone())),
        None | Some(Value::Null) | Some(Value::Bool(false)) => Err(id_required()),
        Some(Value::String(_)) => Err(id_required()),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Err(id_required()),
        Some(_) => Err(DomainError::InvalidInput(
            "Task ID must be a string.".to_string(),
        )),
    }
}

fn id_required() -> DomainError {
    DomainError::InvalidInput("Task ID is required.".to_string())
}

pub fn validate_due_date_range(range: &[String]) -> DomainResult<DueDateRange> {
    let bounds = match range {
        [start, end] => parse_iso_date(start).zip(parse_iso_date(end)),
        _ => None,
    };
    let (start, end) = bounds.ok_or_else(|| {
        DomainError::DateRange("Start date and end date must be valid ISO dates.".to_string())
    })?;

    if start > end {
        return Err(DomainError::DateRange(
            "Start date must be earlier than end date.".to_string(),
        ));
    }

    Ok(DueDateRange { start, end })
}

/// Listing arguments. The completion flag needs no checking; the range is
/// validated only when present.
pub fn validate_get_tasks(
    _completed: Option<bool>,
    due_date_range: Option<&[String]>,
) -> DomainResult<Option<DueDateRange>> {
    due_date_range.map(validate_due_date_range).transpose()
}

/// Collects every violated rule before failing.
pub fn validate_task_create_input(input: &CreateTaskInput) -> DomainResult<NewTask> {
    let mut errors = Vec::new();

    let title = match input.title.as_deref() {
        None | Some("") => {
            errors.push(TITLE_REQUIRED.to_string());
            None
        }
        Some(title) if char_len(title) > TITLE_MAX_CHARS => {
            errors.push(TITLE_TOO_LONG.to_string());
            None
        }
        Some(title) => Some(title.to_string()),
    };

    check_description(input.description.as_deref(), &mut errors);

    let due_date = match input.due_date.as_deref() {
        None | Some("") => {
            errors.push(DUE_DATE_REQUIRED.to_string());
            None
        }
        Some(raw) if !is_valid_iso_date(raw) => {
            errors.push(DUE_DATE_INVALID.to_string());
            None
        }
        Some(raw) => parse_iso_date(raw),
    };

    match (title, due_date) {
        (Some(title), Some(due_date)) if errors.is_empty() => Ok(NewTask {
            title,
            description: input.description.clone(),
            due_date,
        }),
        _ => Err(DomainError::validation(errors)),
    }
}

/// Same rules as creation, applied only to the fields that are present.
/// An omitted title is not checked at all; an empty one is rejected.
pub fn validate_task_update_input(input: &UpdateTaskInput) -> DomainResult<TaskUpdate> {
    let mut errors = Vec::new();

    if let Some(title) = input.title.as_deref() {
        if title.is_empty() {
            errors.push(TITLE_REQUIRED.to_string());
        } else if char_len(title) > TITLE_MAX_CHARS {
            errors.push(TITLE_TOO_LONG.to_string());
        }
    }

    check_description(input.description.as_deref(), &mut errors);

    let due_date = match input.due_date.as_deref() {
        Some(raw) if !is_valid_iso_date(raw) => {
            errors.push(DUE_DATE_INVALID.to_string());
            None
        }
        Some(raw) => parse_iso_date(raw),
        None => None,
    };

    if !errors.is_empty() {
        return Err(DomainError::validation(errors));
    }

    Ok(TaskUpdate {
        title: input.title.clone(),
        description: input.description.clone(),
        due_date,
        completed: input.completed,
    })
}

fn check_description(description: Option<&str>, errors: &mut Vec<String>) {
    if description.is_some_and(|d| char_len(d) > DESCRIPTION_MAX_CHARS) {
        errors.push(DESCRIPTION_TOO_LONG.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
