//! Credential store: account creation and password login.

use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    auth::{hash_password, verify_password, LoginRequest, RegisterRequest},
    error::AppError,
    models::User,
};

/// Creates an account and returns it with its assigned id.
///
/// Uniqueness of the email is left to the `UNIQUE` constraint so a concurrent
/// registration with the same address cannot slip between a check and the insert.
pub async fn register(pool: &SqlitePool, input: &RegisterRequest) -> Result<User, AppError> {
    input.validate()?;

    let password_hash = hash_password(&input.password)?;

    let inserted = sqlx::query_as::<_, User>(
        "INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?)
         RETURNING id, name, email, password_hash",
    )
    .bind(&input.name)
    .bind(&input.email)
    .bind(&password_hash)
    .fetch_one(pool)
    .await;

    match inserted {
        Ok(user) => {
            log::info!("registered user {}", user.id);
            Ok(user)
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(AppError::DuplicateEmail)
        }
        Err(e) => Err(e.into()),
    }
}

/// Returns the user whose email and password match.
///
/// An unknown email and a wrong password produce the same error.
pub async fn authenticate(pool: &SqlitePool, input: &LoginRequest) -> Result<User, AppError> {
    input.validate()?;

    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash FROM users WHERE email = ?",
    )
    .bind(&input.email)
    .fetch_optional(pool)
    .await?;

    let Some(user) = user else {
        return Err(AppError::InvalidCredentials);
    };
    if !verify_password(&input.password, &user.password_hash)? {
        return Err(AppError::InvalidCredentials);
    }
    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, name, email, password_hash FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}
