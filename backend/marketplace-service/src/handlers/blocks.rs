use actix_web::{web, HttpResponse};
use error_types::ServiceError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ApiResponse;
use crate::models::Pagination;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockPayload {
    pub from_realtor: Uuid,
    pub to_realtor: Uuid,
}

/// POST /api/v1/blocks
pub async fn block(
    state: web::Data<AppState>,
    payload: web::Json<BlockPayload>,
) -> Result<HttpResponse, ServiceError> {
    let block = state
        .blocks
        .block(payload.from_realtor, payload.to_realtor)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(block)))
}

/// DELETE /api/v1/blocks/{from}/{to}
pub async fn unblock(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ServiceError> {
    let (from, to) = path.into_inner();
    state.blocks.unblock(from, to).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/v1/blocks/{realtor_id}
pub async fn list_blocked(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    page: web::Query<Pagination>,
) -> Result<HttpResponse, ServiceError> {
    let blocks = state
        .blocks
        .list_blocked(path.into_inner(), page.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(blocks)))
}

/// GET /api/v1/relationships/{realtor_id}/{other_id}
pub async fn relationship_status(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, ServiceError> {
    let (realtor_id, other_id) = path.into_inner();
    let status = state
        .blocks
        .relationship_status(realtor_id, other_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(status)))
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/blocks")
            .route("", web::post().to(block))
            .route("/{from}/{to}", web::delete().to(unblock))
            .route("/{realtor_id}", web::get().to(list_blocked)),
    )
    .route(
        "/api/v1/relationships/{realtor_id}/{other_id}",
        web::get().to(relationship_status),
    );
}
