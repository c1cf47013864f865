use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::error::AppError;

/// Represents the status of a task.
/// Stored as TEXT (`pending`, `in-progress`, `completed`).
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started yet. The default for new tasks.
    #[default]
    Pending,
    /// Currently being worked on.
    InProgress,
    /// Finished.
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Completed => "completed",
        }
    }

    /// Parses an optional status field from a request body.
    ///
    /// `None` and the empty string both mean "not given"; anything else must
    /// be a known status.
    pub fn parse_optional(value: Option<&str>) -> Result<Option<TaskStatus>, AppError> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => s.parse().map(Some),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in-progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            other => Err(AppError::ValidationError(format!(
                "Invalid status '{}'. Expected one of: pending, in-progress, completed.",
                other
            ))),
        }
    }
}

/// Represents a task as stored in the database and returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Task {
    pub id: i64,
    /// Owner of the task.
    pub user_id: i64,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn not_blank(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Task title is required.".into());
        return Err(error);
    }
    Ok(())
}

/// Body of a task creation request.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
pub struct NewTask {
    /// Must contain at least one non-whitespace character.
    #[serde(default)]
    #[validate(custom = "not_blank")]
    pub title: String,

    /// Defaults to the empty string.
    #[serde(default)]
    pub description: Option<String>,

    /// Defaults to `pending` when absent or empty.
    #[serde(default)]
    pub status: Option<String>,
}

/// Body of a task update request. `status` is required; omitted fields keep
/// their stored values.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TaskChanges {
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// Query parameters accepted when listing tasks.
#[derive(Debug, Default, Deserialize)]
pub struct TaskQuery {
    /// Only return tasks with this status.
    pub status: Option<String>,
}
