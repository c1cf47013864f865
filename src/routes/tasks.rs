use crate::{
    auth::AuthenticatedUser,
    error::AppError,
    models::{
        MessageResponse, NewTask, TaskChanges, TaskListResponse, TaskQuery, TaskResponse,
        TaskStatus,
    },
    store::tasks as task_store,
};
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};
use sqlx::SqlitePool;

/// Retrieves the authenticated user's tasks.
///
/// Tasks are returned in creation order. A user without tasks gets an empty list.
///
/// ## Query Parameters:
/// - `status` (optional): only tasks with this status (`pending`, `in-progress`, `completed`).
///
/// ## Responses:
/// - `200 OK`: `{"tasks": [...]}`.
/// - `400 Bad Request`: unknown status filter.
/// - `403 Forbidden`: missing or invalid token.
/// - `500 Internal Server Error`: database failure.
#[get("")]
pub async fn get_tasks(
    pool: web::Data<SqlitePool>,
    user: AuthenticatedUser,
    query_params: web::Query<TaskQuery>,
) -> Result<impl Responder, AppError> {
    let status = TaskStatus::parse_optional(query_params.status.as_deref())?;
    let tasks = task_store::list_for_user(&pool, user.id(), status).await?;

    Ok(HttpResponse::Ok().json(TaskListResponse { tasks }))
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: required, not blank.
/// - `description` (optional): defaults to `""`.
/// - `status` (optional): defaults to `pending`.
///
/// ## Responses:
/// - `201 Created`: `{"message", "task"}`.
/// - `400 Bad Request`: blank title or unknown status.
/// - `403 Forbidden`: missing or invalid token.
/// - `500 Internal Server Error`: database failure.
#[post("")]
pub async fn create_task(
    pool: web::Data<SqlitePool>,
    user: AuthenticatedUser,
    task_data: web::Json<NewTask>,
) -> Result<impl Responder, AppError> {
    let task = task_store::create(&pool, user.id(), task_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(TaskResponse {
        message: "Task created successfully".into(),
        task,
    }))
}

/// Retrieves one of the authenticated user's tasks.
///
/// ## Responses:
/// - `200 OK`: `{"task"}`.
/// - `403 Forbidden`: missing or invalid token.
/// - `404 Not Found`: no such task for this user.
#[get("/{id}")]
pub async fn get_task(
    pool: web::Data<SqlitePool>,
    user: AuthenticatedUser,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task = task_store::find(&pool, user.id(), task_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(TaskResponse {
        message: String::new(),
        task,
    }))
}

/// Updates one of the authenticated user's tasks.
///
/// ## Request Body:
/// - `status`: required.
/// - `title`, `description` (optional): omitted values are kept.
///
/// ## Responses:
/// - `200 OK`: `{"message", "task"}` with the stored task after the update.
/// - `400 Bad Request`: missing or unknown status.
/// - `403 Forbidden`: missing or invalid token.
/// - `404 Not Found`: no such task for this user.
#[put("/{id}")]
pub async fn update_task(
    pool: web::Data<SqlitePool>,
    user: AuthenticatedUser,
    task_id: web::Path<i64>,
    task_data: web::Json<TaskChanges>,
) -> Result<impl Responder, AppError> {
    let task = task_store::update(
        &pool,
        user.id(),
        task_id.into_inner(),
        task_data.into_inner(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(TaskResponse {
        message: "Task updated successfully".into(),
        task,
    }))
}

/// Deletes one of the authenticated user's tasks.
///
/// ## Responses:
/// - `200 OK`: `{"message"}`.
/// - `403 Forbidden`: missing or invalid token.
/// - `404 Not Found`: no such task for this user.
#[delete("/{id}")]
pub async fn delete_task(
    pool: web::Data<SqlitePool>,
    user: AuthenticatedUser,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    task_store::delete(&pool, user.id(), task_id.into_inner()).await?;

    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Task deleted successfully.".into(),
    }))
}
