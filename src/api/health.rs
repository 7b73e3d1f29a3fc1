use actix_web::{get, web, HttpResponse, Responder};
use serde::Serialize;
use sqlx::{Pool, Postgres};
use tracing::error;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    database: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl HealthResponse {
    fn ok(status: &str) -> Self {
        Self {
            status: status.to_string(),
            database: "connected".to_string(),
            error: None,
        }
    }

    fn unavailable(status: &str, e: sqlx::Error) -> Self {
        Self {
            status: status.to_string(),
            database: "disconnected".to_string(),
            error: Some(format!("Database error: {}", e)),
        }
    }
}

async fn probe(pool: &Pool<Postgres>) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").fetch_one(pool).await.map(|_| ())
}

/// General health check including document-store connectivity. Use for load
/// balancers and uptime monitors.
#[get("/health")]
async fn health_check(pool: web::Data<Pool<Postgres>>) -> impl Responder {
    match probe(pool.get_ref()).await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse::ok("healthy")),
        Err(e) => {
            error!("Health check failed: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse::unavailable("unhealthy", e))
        }
    }
}

/// Readiness probe: removes the instance from the load balancer while the
/// store is unreachable; recovers when it returns.
#[get("/ready")]
async fn readiness_check(pool: web::Data<Pool<Postgres>>) -> impl Responder {
    match probe(pool.get_ref()).await {
        Ok(()) => HttpResponse::Ok().json(HealthResponse::ok("ready")),
        Err(e) => {
            error!("Readiness check failed: {:?}", e);
            HttpResponse::ServiceUnavailable().json(HealthResponse::unavailable("not_ready", e))
        }
    }
}

/// Liveness probe: process-alive only, no dependency checks.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "alive".to_string(),
        database: "not_checked".to_string(),
        error: None,
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}
