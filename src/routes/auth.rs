use crate::{
    auth::{AuthResponse, LoginRequest, RegisterRequest, TokenKeys},
    error::AppError,
    store::users,
};
use actix_web::{post, web, HttpResponse, Responder};
use sqlx::SqlitePool;

/// Register a new user
///
/// Creates a new account and returns a session token for it.
///
/// ## Responses:
/// - `201 Created`: `{"message", "token"}`.
/// - `400 Bad Request`: missing fields, malformed email, or email already in use.
/// - `500 Internal Server Error`: database or hashing failure.
#[post("/register")]
pub async fn register(
    pool: web::Data<SqlitePool>,
    keys: web::Data<TokenKeys>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = users::register(&pool, &register_data).await?;
    let token = keys.issue(&user)?;

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User registered successfully".into(),
        token,
    }))
}

/// Login user
///
/// Authenticates a user and returns a fresh session token.
///
/// ## Responses:
/// - `200 OK`: `{"message", "token"}`.
/// - `400 Bad Request`: missing fields or invalid credentials.
/// - `500 Internal Server Error`: database or hashing failure.
#[post("/login")]
pub async fn login(
    pool: web::Data<SqlitePool>,
    keys: web::Data<TokenKeys>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let user = users::authenticate(&pool, &login_data).await?;
    let token = keys.issue(&user)?;
    log::info!("user {} logged in", user.id);

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".into(),
        token,
    }))
}
