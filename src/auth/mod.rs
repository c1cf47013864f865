pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys};

lazy_static! {
    // local part, '@', domain containing a dot, 2-6 letter TLD
    pub static ref EMAIL_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-zA-Z0-9._-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,6}$").unwrap();
}

/// Represents the payload for a new user registration request.
///
/// Missing fields deserialize to empty strings so they are reported by
/// validation (400) rather than by the JSON extractor.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Name, email, and password are required."))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Name, email, and password are required."))]
    #[validate(custom = "email_format")]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Name, email, and password are required."))]
    pub password: String,
}

/// An empty email is only reported as a missing field.
fn email_format(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() || EMAIL_REGEX.is_match(email) {
        return Ok(());
    }
    let mut error = ValidationError::new("email");
    error.message = Some("Invalid email format.".into());
    Err(error)
}

/// Represents the payload for a user login request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Email and password are required."))]
    pub password: String,
}

/// Response body after successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    /// The signed session token.
    pub token: String,
}
