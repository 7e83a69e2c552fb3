//! Push delivery seam.
//!
//! The dispatcher talks to [`PushProvider`]; production wires in FCM, tests
//! wire in a recorder.

use async_trait::async_trait;
use fcm_shared::{FCMClient, FCMError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PushError {
    #[error(transparent)]
    Fcm(#[from] FCMError),

    #[error("push rejected: {0}")]
    Rejected(String),
}

impl PushError {
    /// The device token is unknown to the provider and will never succeed.
    pub fn is_unregistered_token(&self) -> bool {
        matches!(self, PushError::Fcm(e) if e.is_unregistered_token())
    }
}

#[async_trait]
pub trait PushProvider: Send + Sync {
    /// Deliver one notification to one device. Returns the provider message id.
    async fn send(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
        data: Option<serde_json::Value>,
    ) -> Result<Option<String>, PushError>;
}

pub struct FcmPushProvider {
    client: FCMClient,
}

impl FcmPushProvider {
    pub fn new(client: FCMClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PushProvider for FcmPushProvider {
    async fn send(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
        data: Option<serde_json::Value>,
    ) -> Result<Option<String>, PushError> {
        let result = self.client.send(device_token, title, body, data).await?;
        Ok(result.message_id)
    }
}
