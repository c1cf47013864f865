//! Task store. Every statement is scoped by the owning user's id.

use chrono::Utc;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    error::AppError,
    models::{NewTask, Task, TaskChanges, TaskStatus},
};

const TASK_COLUMNS: &str = "id, user_id, title, description, status, created_at, updated_at";

/// Returns the user's tasks in insertion order, optionally only those with `status`.
pub async fn list_for_user(
    pool: &SqlitePool,
    user_id: i64,
    status: Option<TaskStatus>,
) -> Result<Vec<Task>, AppError> {
    let tasks = match status {
        Some(status) => {
            let sql = format!(
                "SELECT {} FROM tasks WHERE user_id = ? AND status = ? ORDER BY id",
                TASK_COLUMNS
            );
            sqlx::query_as::<_, Task>(&sql)
                .bind(user_id)
                .bind(status)
                .fetch_all(pool)
                .await?
        }
        None => {
            let sql = format!(
                "SELECT {} FROM tasks WHERE user_id = ? ORDER BY id",
                TASK_COLUMNS
            );
            sqlx::query_as::<_, Task>(&sql)
                .bind(user_id)
                .fetch_all(pool)
                .await?
        }
    };
    Ok(tasks)
}

/// Inserts a task owned by `user_id`. created_at and updated_at are equal.
pub async fn create(pool: &SqlitePool, user_id: i64, input: NewTask) -> Result<Task, AppError> {
    input.validate()?;
    let status = TaskStatus::parse_optional(input.status.as_deref())?.unwrap_or_default();
    let now = Utc::now();

    let sql = format!(
        "INSERT INTO tasks (user_id, title, description, status, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)
         RETURNING {}",
        TASK_COLUMNS
    );
    let task = sqlx::query_as::<_, Task>(&sql)
        .bind(user_id)
        .bind(&input.title)
        .bind(input.description.unwrap_or_default())
        .bind(status)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;

    log::info!("user {} created task {}", user_id, task.id);
    Ok(task)
}

pub async fn find(pool: &SqlitePool, user_id: i64, task_id: i64) -> Result<Task, AppError> {
    let sql = format!(
        "SELECT {} FROM tasks WHERE id = ? AND user_id = ?",
        TASK_COLUMNS
    );
    sqlx::query_as::<_, Task>(&sql)
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found.".into()))
}

/// Applies `changes` to the user's task and refreshes updated_at.
///
/// `status` is required. A missing or blank title and a missing or empty
/// description keep their stored values. Ownership is part of the `WHERE`
/// clause, so a task of another user is reported exactly like a missing one.
pub async fn update(
    pool: &SqlitePool,
    user_id: i64,
    task_id: i64,
    changes: TaskChanges,
) -> Result<Task, AppError> {
    let status = TaskStatus::parse_optional(changes.status.as_deref())?
        .ok_or_else(|| AppError::ValidationError("Status is required.".into()))?;
    let title = changes
        .title
        .as_deref()
        .filter(|title| !title.trim().is_empty());
    let description = changes
        .description
        .as_deref()
        .filter(|description| !description.is_empty());

    let sql = format!(
        "UPDATE tasks
         SET status = ?, title = COALESCE(?, title), description = COALESCE(?, description), updated_at = ?
         WHERE id = ? AND user_id = ?
         RETURNING {}",
        TASK_COLUMNS
    );
    let task = sqlx::query_as::<_, Task>(&sql)
        .bind(status)
        .bind(title)
        .bind(description)
        .bind(Utc::now())
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found or unauthorized.".into()))?;

    log::info!("user {} updated task {}", user_id, task.id);
    Ok(task)
}

/// Permanently removes the user's task.
pub async fn delete(pool: &SqlitePool, user_id: i64, task_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
        .bind(task_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "Task not found or you are not authorized to delete it.".into(),
        ));
    }

    log::info!("user {} deleted task {}", user_id, task_id);
    Ok(())
}
