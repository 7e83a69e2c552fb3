use actix_web::{web, HttpResponse};
use error_types::ServiceError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{validate_payload, ApiResponse};
use crate::models::{NewFeedback, Pagination};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GiveFeedbackPayload {
    pub from_realtor: Uuid,
    pub to_realtor: Uuid,
    pub job_id: Option<Uuid>,
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// POST /api/v1/feedback
pub async fn give_feedback(
    state: web::Data<AppState>,
    payload: web::Json<GiveFeedbackPayload>,
) -> Result<HttpResponse, ServiceError> {
    validate_payload(&*payload)?;
    let payload = payload.into_inner();

    let feedback = state
        .feedback
        .give_feedback(NewFeedback {
            from_realtor: payload.from_realtor,
            to_realtor: payload.to_realtor,
            job_id: payload.job_id,
            rating: payload.rating,
            comment: payload.comment,
        })
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(feedback)))
}

/// GET /api/v1/feedback/{realtor_id}
pub async fn list_feedback(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    page: web::Query<Pagination>,
) -> Result<HttpResponse, ServiceError> {
    let feedback = state
        .feedback
        .list_feedback(path.into_inner(), page.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(feedback)))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/feedback")
            .route("", web::post().to(give_feedback))
            .route("/{realtor_id}", web::get().to(list_feedback)),
    );
}
