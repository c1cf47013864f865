pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::{
    error::{JsonPayloadError, PathError},
    web, HttpRequest,
};

use crate::auth::AuthMiddleware;
use crate::error::AppError;

/// Registers the API under the scope it is mounted on (normally `/api`).
///
/// Registration and login are public; every `/tasks` route sits behind
/// `AuthMiddleware`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .service(
            web::scope("/auth")
                .service(auth::login)
                .service(auth::register),
        )
        .service(
            web::scope("/tasks")
                .wrap(AuthMiddleware)
                .service(tasks::get_tasks)
                .service(tasks::create_task)
                .service(tasks::get_task)
                .service(tasks::update_task)
                .service(tasks::delete_task),
        );
}

/// Malformed bodies get the same `{"message"}` shape as every other error.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::ValidationError(format!("Invalid JSON body: {}", err)).into()
}

/// A task id that is not an integer cannot name any task.
fn path_error(err: PathError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("unparsable path {}: {}", req.path(), err);
    AppError::NotFound("Task not found.".into()).into()
}
