use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use tracing::warn;

use crate::config::SERVICE_NAME;

pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().body("OK")
}

/// GET /health/ready
pub async fn readiness(pool: web::Data<PgPool>) -> HttpResponse {
    let conn = db_pool::acquire_with_metrics(pool.get_ref(), SERVICE_NAME).await;
    let result = match conn {
        Ok(mut conn) => sqlx::query("SELECT 1").execute(&mut *conn).await.map(|_| ()),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({ "status": "ready" })),
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "unavailable",
                "error": e.to_string(),
            }))
        }
    }
}
