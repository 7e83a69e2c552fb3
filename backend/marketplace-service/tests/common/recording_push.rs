use async_trait::async_trait;
use fcm_shared::FCMError;
use marketplace_service::services::{PushError, PushProvider};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPush {
    pub device_token: String,
    pub title: String,
    pub body: String,
}

/// Push provider that records every send instead of calling FCM.
#[derive(Clone, Default)]
pub struct RecordingPushProvider {
    sent: Arc<Mutex<Vec<SentPush>>>,
    failing_tokens: Arc<Mutex<HashSet<String>>>,
    unregistered_tokens: Arc<Mutex<HashSet<String>>>,
}

impl RecordingPushProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sends to `token` will be rejected.
    pub fn fail_token(&self, token: &str) {
        self.failing_tokens
            .lock()
            .unwrap()
            .insert(token.to_string());
    }

    /// Sends to `token` fail the way FCM answers for an uninstalled app.
    pub fn unregister_token(&self, token: &str) {
        self.unregistered_tokens
            .lock()
            .unwrap()
            .insert(token.to_string());
    }

    pub fn sent(&self) -> Vec<SentPush> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, token: &str) -> Vec<SentPush> {
        self.sent()
            .into_iter()
            .filter(|push| push.device_token == token)
            .collect()
    }
}

#[async_trait]
impl PushProvider for RecordingPushProvider {
    async fn send(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
        _data: Option<serde_json::Value>,
    ) -> Result<Option<String>, PushError> {
        self.sent.lock().unwrap().push(SentPush {
            device_token: device_token.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });

        if self.unregistered_tokens.lock().unwrap().contains(device_token) {
            return Err(PushError::Fcm(FCMError::ApiError(
                "404 Not Found".to_string(),
                r#"{"error":{"status":"NOT_FOUND","details":[{"errorCode":"UNREGISTERED"}]}}"#
                    .to_string(),
            )));
        }
        if self.failing_tokens.lock().unwrap().contains(device_token) {
            return Err(PushError::Rejected(format!("token {device_token} rejected")));
        }
        Ok(Some(format!("projects/test/messages/{}", uuid::Uuid::new_v4())))
    }
}
