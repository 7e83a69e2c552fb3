use actix_web::{web, HttpResponse};
use error_types::ServiceError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ApiResponse;
use crate::models::{NotificationEvent, Pagination};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomNotificationPayload {
    pub sender_id: Uuid,
    /// Job id for `appliedJob`, realtor id otherwise
    pub receiver_id: Uuid,
    pub notification_type: NotificationEvent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiverPayload {
    pub receiver_id: Uuid,
}

/// POST /api/v1/notifications/custom
///
/// Runs the dispatch inline and reports the outcome; dispatch problems are
/// never an HTTP error.
pub async fn custom_notification(
    state: web::Data<AppState>,
    payload: web::Json<CustomNotificationPayload>,
) -> Result<HttpResponse, ServiceError> {
    let outcome = state
        .dispatcher
        .custom_notification(
            payload.sender_id,
            payload.receiver_id,
            payload.notification_type,
        )
        .await;
    Ok(HttpResponse::Accepted().json(ApiResponse::ok(outcome)))
}

/// GET /api/v1/notifications/{receiver_id}
pub async fn list_notifications(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    page: web::Query<Pagination>,
) -> Result<HttpResponse, ServiceError> {
    let notifications = state
        .inbox
        .list_notifications(path.into_inner(), page.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(notifications)))
}

/// PUT /api/v1/notifications/{id}/read
pub async fn mark_read(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<ReceiverPayload>,
) -> Result<HttpResponse, ServiceError> {
    state
        .inbox
        .mark_notification_read(path.into_inner(), payload.receiver_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/v1/notifications/{id}?receiver_id=
pub async fn delete_notification(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    query: web::Query<ReceiverPayload>,
) -> Result<HttpResponse, ServiceError> {
    state
        .inbox
        .delete_notification(path.into_inner(), query.receiver_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/notifications")
            .route("/custom", web::post().to(custom_notification))
            .route("/{receiver_id}", web::get().to(list_notifications))
            .route("/{id}/read", web::put().to(mark_read))
            .route("/{id}", web::delete().to(delete_notification)),
    );
}
