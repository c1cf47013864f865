#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{http::header, test, web, App};
use serde_json::json;
use sqlx::SqlitePool;
use tasklet::auth::{AuthResponse, TokenKeys};
use tasklet::db::init_pool;
use tasklet::routes::{self, health};

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

pub async fn test_pool() -> SqlitePool {
    init_pool("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database")
}

pub fn test_keys() -> TokenKeys {
    TokenKeys::new(TEST_SECRET, chrono::Duration::days(1))
}

/// The production app layout, backed by `pool`.
pub async fn test_app(
    pool: SqlitePool,
) -> impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool))
            .app_data(web::Data::new(test_keys()))
            .wrap(Logger::default())
            .service(health::health)
            .service(web::scope("/api").configure(routes::config)),
    )
    .await
}

/// Registers a user through the API and returns the session token.
pub async fn register_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    name: &str,
    email: &str,
    password: &str,
) -> Result<String, String> {
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "name": name,
            "email": email,
            "password": password
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;

    if !status.is_success() {
        return Err(format!(
            "Failed to register user. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }
    let auth: AuthResponse = serde_json::from_slice(&body)
        .map_err(|e| format!("Failed to parse registration response: {}", e))?;
    Ok(auth.token)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}
