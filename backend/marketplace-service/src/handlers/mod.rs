/// HTTP handlers for the marketplace API
pub mod blocks;
pub mod connections;
pub mod feedback;
pub mod health;
pub mod jobs;
pub mod messages;
pub mod notifications;
pub mod realtors;

use actix_web::web;
use error_types::{ServiceError, ServiceResult};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::metrics;

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

pub(crate) fn validate_payload<T: Validate>(payload: &T) -> ServiceResult<()> {
    payload
        .validate()
        .map_err(|e| ServiceError::ValidationError(e.to_string()))
}

/// Extractor failures use the same error body as the services.
fn extractor_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        ServiceError::ValidationError(err.to_string()).into()
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        ServiceError::BadRequest(err.to_string()).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        ServiceError::BadRequest(err.to_string()).into()
    }));
}

/// Every route the service exposes. Expects `web::Data<AppState>` on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    extractor_config(cfg);
    cfg.route("/health", web::get().to(health::liveness))
        .route("/metrics", web::get().to(metrics::serve_metrics));

    realtors::register_routes(cfg);
    connections::register_routes(cfg);
    blocks::register_routes(cfg);
    messages::register_routes(cfg);
    notifications::register_routes(cfg);
    jobs::register_routes(cfg);
    feedback::register_routes(cfg);
}
