//!
//! # Custom Error Handling
//!
//! This module defines the error type `AppError` used throughout the service.
//! Every failure a handler can produce is one of its variants, and each variant
//! maps to exactly one HTTP status code.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers can return
//! `Result<_, AppError>` and Actix Web renders a `{"message": ...}` JSON body.
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors` and
//! `bcrypt::BcryptError` make the `?` operator usable in store and route code.
//!
//! Server-side failures (database, hashing, token signing) are logged here and
//! rendered with a generic message; their details never reach the client.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Generic body for every 5xx response.
const SERVER_ERROR_MESSAGE: &str = "Server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input (HTTP 400).
    ValidationError(String),
    /// Registration with an email that already has an account (HTTP 400).
    DuplicateEmail,
    /// Unknown email or wrong password (HTTP 400).
    /// Both cases share one message so callers cannot probe for accounts.
    InvalidCredentials,
    /// Missing, malformed or wrongly signed session token (HTTP 403).
    InvalidToken(String),
    /// Correctly signed session token past its expiration (HTTP 403).
    ExpiredToken,
    /// A handler expected authenticated claims that the gate never attached (HTTP 401).
    Unauthorized(String),
    /// The requested resource does not exist for the caller (HTTP 404).
    NotFound(String),
    /// Failure inside the persistence layer (HTTP 500).
    DatabaseError(String),
    /// Any other unexpected server-side failure (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "{}", msg),
            AppError::DuplicateEmail => write!(f, "Email already in use."),
            AppError::InvalidCredentials => write!(f, "Invalid email or password."),
            AppError::InvalidToken(msg) => write!(f, "{}", msg),
            AppError::ExpiredToken => write!(f, "Token has expired."),
            AppError::Unauthorized(msg) => write!(f, "{}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::DuplicateEmail
            | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::InvalidToken(_) | AppError::ExpiredToken => StatusCode::FORBIDDEN,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                SERVER_ERROR_MESSAGE.to_string()
            }
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "message": message }))
    }
}

/// Converts `sqlx::Error` into `AppError::DatabaseError`, logging the cause.
///
/// Callers that care about `RowNotFound` or constraint violations match on the
/// `sqlx::Error` themselves before falling back to this conversion.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        log::error!("database error: {}", error);
        AppError::DatabaseError(error.to_string())
    }
}

/// Converts `validator::ValidationErrors` into a single readable `ValidationError`.
///
/// Field messages are emitted in field-name order so the text is stable.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let mut messages: Vec<String> = Vec::new();
        for (field, field_errors) in fields {
            for error in field_errors {
                let message = match &error.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                };
                if !messages.contains(&message) {
                    messages.push(message);
                }
            }
        }

        if messages.is_empty() {
            AppError::ValidationError("Invalid input.".into())
        } else {
            AppError::ValidationError(messages.join(" "))
        }
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        log::error!("password hashing error: {}", error);
        AppError::InternalServerError(error.to_string())
    }
}
