use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;
use sqlx::SqlitePool;
use std::time::Duration;

/// Longest the database probe may take before it counts as unavailable.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Health check endpoint
///
/// Reports whether the database answers a trivial query. Always public.
#[get("/health")]
pub async fn health(pool: web::Data<SqlitePool>) -> impl Responder {
    let probe = sqlx::query("SELECT 1").execute(pool.get_ref());
    let database = match tokio::time::timeout(PROBE_TIMEOUT, probe).await {
        Ok(Ok(_)) => "ok",
        Ok(Err(e)) => {
            log::warn!("health check query failed: {}", e);
            "unavailable"
        }
        Err(_) => {
            log::warn!("health check query timed out after {:?}", PROBE_TIMEOUT);
            "unavailable"
        }
    };

    let body = json!({
        "status": if database == "ok" { "ok" } else { "degraded" },
        "database": database,
        "timestamp": Utc::now()
    });

    if database == "ok" {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}
