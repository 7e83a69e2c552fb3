use actix_web::{web, HttpResponse};
use error_types::ServiceError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ApiResponse;
use crate::models::{ConnectionFilter, ConnectionUpdate};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateConnectionPayload {
    pub from_id: Uuid,
    pub to_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConnectionPayload {
    pub from_id: Uuid,
    pub to_id: Uuid,
    pub connected: bool,
}

/// POST /api/v1/connections
pub async fn create_request(
    state: web::Data<AppState>,
    payload: web::Json<CreateConnectionPayload>,
) -> Result<HttpResponse, ServiceError> {
    let connection = state
        .connections
        .create_request(payload.from_id, payload.to_id)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(connection)))
}

/// GET /api/v1/connections?realtor_id=&connected=&limit=&offset=
pub async fn get_all(
    state: web::Data<AppState>,
    filter: web::Query<ConnectionFilter>,
) -> Result<HttpResponse, ServiceError> {
    let connections = state.connections.get_all(&filter).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(connections)))
}

/// GET /api/v1/connections/{id}
pub async fn get_by_id(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let connection = state.connections.get_by_id(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(connection)))
}

/// PUT /api/v1/connections
pub async fn update_request(
    state: web::Data<AppState>,
    payload: web::Json<UpdateConnectionPayload>,
) -> Result<HttpResponse, ServiceError> {
    let connection = state
        .connections
        .update_request(
            payload.from_id,
            payload.to_id,
            ConnectionUpdate {
                connected: payload.connected,
            },
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(connection)))
}

/// DELETE /api/v1/connections/{id}
pub async fn delete_request(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let deleted = state.connections.delete_request(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(deleted)))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/connections")
            .route("", web::post().to(create_request))
            .route("", web::get().to(get_all))
            .route("", web::put().to(update_request))
            .route("/{id}", web::get().to(get_by_id))
            .route("/{id}", web::delete().to(delete_request)),
    );
}
