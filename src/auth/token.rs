use crate::{config::Config, error::AppError, models::User};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Represents the claims encoded within a session token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// The user's id.
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Signing and verification keys derived from the server secret.
///
/// Built once at start-up and shared read-only by every worker through
/// `web::Data<TokenKeys>`.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            Duration::seconds(config.token_ttl_seconds),
        )
    }

    /// Mints a token for `user` that expires one TTL from now.
    pub fn issue(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        self.sign(&claims)
    }

    /// Verifies the signature and expiration of `token` and returns its claims.
    ///
    /// Returns `AppError::ExpiredToken` for a correctly signed token past its
    /// expiration, and `AppError::InvalidToken` for everything else.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        if token.trim().is_empty() {
            return Err(AppError::InvalidToken(
                "Access denied. No token provided.".into(),
            ));
        }

        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AppError::ExpiredToken,
                _ => {
                    log::debug!("rejected token: {}", e);
                    AppError::InvalidToken("Invalid token.".into())
                }
            })
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(|e| {
            log::error!("failed to sign token: {}", e);
            AppError::InternalServerError(format!("Failed to generate token: {}", e))
        })
    }
}
