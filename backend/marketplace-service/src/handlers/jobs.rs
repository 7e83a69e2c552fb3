use actix_web::{web, HttpResponse};
use error_types::ServiceError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{validate_payload, ApiResponse};
use crate::models::{NewJob, Pagination};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    pub owner_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(max = 255))]
    pub location: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyPayload {
    pub applicant_id: Uuid,
}

/// POST /api/v1/jobs
pub async fn create_job(
    state: web::Data<AppState>,
    payload: web::Json<CreateJobPayload>,
) -> Result<HttpResponse, ServiceError> {
    validate_payload(&*payload)?;
    let payload = payload.into_inner();

    let job = state
        .jobs
        .create_job(NewJob {
            owner_id: payload.owner_id,
            title: payload.title,
            description: payload.description,
            location: payload.location,
            price: payload.price,
        })
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(job)))
}

/// GET /api/v1/jobs
pub async fn list_jobs(
    state: web::Data<AppState>,
    page: web::Query<Pagination>,
) -> Result<HttpResponse, ServiceError> {
    let jobs = state.jobs.list_jobs(page.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(jobs)))
}

/// GET /api/v1/jobs/{id}
pub async fn get_job(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let job = state.jobs.get_job(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(job)))
}

/// POST /api/v1/jobs/{id}/apply
pub async fn apply(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<ApplyPayload>,
) -> Result<HttpResponse, ServiceError> {
    let job = state
        .jobs
        .apply_to_job(path.into_inner(), payload.applicant_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(job)))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/jobs")
            .route("", web::post().to(create_job))
            .route("", web::get().to(list_jobs))
            .route("/{id}", web::get().to(get_job))
            .route("/{id}/apply", web::post().to(apply)),
    );
}
