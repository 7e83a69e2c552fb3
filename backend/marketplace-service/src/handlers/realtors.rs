use actix_web::{web, HttpResponse};
use error_types::ServiceError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{validate_payload, ApiResponse};
use crate::models::NewRealtor;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRealtorPayload {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(url)]
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterDevicePayload {
    #[validate(length(min = 10, max = 1000))]
    pub token: String,
}

/// POST /api/v1/realtors
pub async fn create_realtor(
    state: web::Data<AppState>,
    payload: web::Json<CreateRealtorPayload>,
) -> Result<HttpResponse, ServiceError> {
    validate_payload(&*payload)?;
    let payload = payload.into_inner();

    let realtor = state
        .realtors
        .create_realtor(NewRealtor {
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            profile_image: payload.profile_image,
        })
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok(realtor)))
}

/// GET /api/v1/realtors/{id}
pub async fn get_realtor(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ServiceError> {
    let realtor = state.realtors.get_realtor(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(realtor)))
}

/// POST /api/v1/realtors/{id}/devices
pub async fn register_device(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: web::Json<RegisterDevicePayload>,
) -> Result<HttpResponse, ServiceError> {
    validate_payload(&*payload)?;
    let device_count = state
        .realtors
        .register_device_token(path.into_inner(), &payload.token)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(serde_json::json!({
        "device_count": device_count
    }))))
}

/// DELETE /api/v1/realtors/{id}/devices/{token}
pub async fn unregister_device(
    state: web::Data<AppState>,
    path: web::Path<(Uuid, String)>,
) -> Result<HttpResponse, ServiceError> {
    let (realtor_id, token) = path.into_inner();
    state
        .realtors
        .unregister_device_token(realtor_id, &token)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn register_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/realtors")
            .route("", web::post().to(create_realtor))
            .route("/{id}", web::get().to(get_realtor))
            .route("/{id}/devices", web::post().to(register_device))
            .route("/{id}/devices/{token}", web::delete().to(unregister_device)),
    );
}
