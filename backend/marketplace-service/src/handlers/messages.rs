use actix_web::{web, HttpResponse};
use error_types::ServiceError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{validate_payload, ApiResponse};
use crate::models::{MessageType, Pagination};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessagePayload {
    pub sender_id: Uuid,
    pub connection_id: Uuid,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
    #[serde(default)]
    pub message_type: MessageType,
}

/// POST /api/v1/messages
pub async fn send_message(
    state: web::Data<AppState>,
    payload: web::Json<SendMessagePayload>,
) -> Result<HttpResponse, ServiceError> {
    validate_payload(&*payload)?;
    let message = state
        .messages
        .send_message(
            payload.sender_id,
            payload.connection_id,
            &payload.message,
            payload.message_type,
        )
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(message)))
}

/// GET /api/v1/messages/connection/{connection_id}
pub async fn list_messages(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    page: web::Query<Pagination>,
) -> Result<HttpResponse, ServiceError> {
    let messages = state
        .messages
        .list_messages(path.into_inner(), page.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(messages)))
}

/// PUT /api/v1/messages/{id}/read
pub async fn mark_read(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let message = state.messages.mark_read(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(message)))
}

/// DELETE /api/v1/messages/connection/{connection_id}
pub async fn delete_for_connection(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let deleted = state
        .messages
        .delete_messages_for_connection(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({ "deleted": deleted }))))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/messages")
            .route("", web::post().to(send_message))
            .route("/connection/{connection_id}", web::get().to(list_messages))
            .route(
                "/connection/{connection_id}",
                web::delete().to(delete_for_connection),
            )
            .route("/{id}/read", web::put().to(mark_read)),
    );
}
