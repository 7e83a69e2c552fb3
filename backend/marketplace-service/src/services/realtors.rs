use error_types::{ServiceError, ServiceResult};
use fcm_shared::FCMClient;
use tracing::info;
use uuid::Uuid;

use super::require_realtor;
use crate::models::{NewRealtor, Realtor};
use crate::repository::Repositories;

pub struct RealtorService {
    repos: Repositories,
}

impl RealtorService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn create_realtor(&self, mut realtor: NewRealtor) -> ServiceResult<Realtor> {
        realtor.first_name = realtor.first_name.trim().to_string();
        realtor.last_name = realtor.last_name.trim().to_string();
        realtor.email = realtor.email.trim().to_lowercase();

        if realtor.first_name.is_empty() {
            return Err(ServiceError::ValidationError(
                "first_name must not be empty".to_string(),
            ));
        }
        if !realtor.email.contains('@') {
            return Err(ServiceError::ValidationError(format!(
                "invalid email: {}",
                realtor.email
            )));
        }

        let created = self.repos.realtors.create_realtor(realtor).await?;
        info!(realtor_id = %created.id, "Realtor created");
        Ok(created)
    }

    pub async fn get_realtor(&self, id: Uuid) -> ServiceResult<Realtor> {
        require_realtor(&self.repos, id).await
    }

    /// Idempotent; returns how many devices the realtor now has.
    pub async fn register_device_token(&self, realtor_id: Uuid, token: &str) -> ServiceResult<usize> {
        let token = token.trim();
        if !FCMClient::validate_token(token) {
            return Err(ServiceError::ValidationError(
                "device token must be between 10 and 1000 characters".to_string(),
            ));
        }

        let tokens = self
            .repos
            .realtors
            .add_device_token(realtor_id, token)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("realtor {realtor_id}")))?;

        info!(%realtor_id, devices = tokens.len(), "Device token registered");
        Ok(tokens.len())
    }

    pub async fn unregister_device_token(&self, realtor_id: Uuid, token: &str) -> ServiceResult<()> {
        require_realtor(&self.repos, realtor_id).await?;

        if !self
            .repos
            .realtors
            .remove_device_token(realtor_id, token.trim())
            .await?
        {
            return Err(ServiceError::NotFound("device token".to_string()));
        }

        info!(%realtor_id, "Device token unregistered");
        Ok(())
    }
}
