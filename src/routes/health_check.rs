use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::repository::Repositories;

/// GET /health/router
pub async fn router_health() -> HttpResponse {
    tracing::debug!("Router health check called");
    HttpResponse::Ok().json(json!({ "status": "Router is healthy" }))
}

/// GET /health/database
///
/// 503 when the database does not answer a ping
pub async fn database_health(repositories: web::Data<Repositories>) -> HttpResponse {
    match repositories.health.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "status": "Database is healthy" })),
        Err(e) => {
            tracing::error!(error = %e, "Database health check failed");
            HttpResponse::ServiceUnavailable().json(json!({ "status": "Database is unavailable" }))
        }
    }
}
