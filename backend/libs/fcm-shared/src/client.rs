use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::FCMError;
use crate::models::*;

const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";
const FCM_ENDPOINT: &str = "https://fcm.googleapis.com/v1/projects";
/// Refresh the cached access token this many seconds before it expires.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

pub const MIN_TOKEN_LEN: usize = 10;
pub const MAX_TOKEN_LEN: usize = 1000;

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> Result<Self, FCMError> {
        serde_json::from_str(raw).map_err(|e| FCMError::CredentialsParse(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FCMError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| FCMError::CredentialsRead(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&raw)
    }
}

/// Firebase Cloud Messaging client
///
/// Cheap to clone; clones share the access token cache and HTTP connection pool.
#[derive(Clone)]
pub struct FCMClient {
    pub project_id: String,
    credentials: Arc<ServiceAccountKey>,
    token_cache: Arc<Mutex<Option<TokenCache>>>,
    http_client: reqwest::Client,
}

impl FCMClient {
    pub fn new(project_id: String, credentials: ServiceAccountKey) -> Self {
        Self {
            project_id,
            credentials: Arc::new(credentials),
            token_cache: Arc::new(Mutex::new(None)),
            http_client: reqwest::Client::new(),
        }
    }

    /// FCM tokens are opaque; only the length is checked.
    pub fn validate_token(device_token: &str) -> bool {
        let len = device_token.trim().len();
        (MIN_TOKEN_LEN..=MAX_TOKEN_LEN).contains(&len)
    }

    fn send_url(&self) -> String {
        format!("{}/{}/messages:send", FCM_ENDPOINT, self.project_id)
    }

    /// Send a notification to one device.
    pub async fn send(
        &self,
        device_token: &str,
        title: &str,
        body: &str,
        data: Option<serde_json::Value>,
    ) -> Result<FCMSendResult, FCMError> {
        if !Self::validate_token(device_token) {
            return Err(FCMError::InvalidToken);
        }

        let access_token = self.get_access_token().await?;

        let message = FcmMessage {
            message: FcmMessageContent {
                token: device_token.to_string(),
                notification: FcmNotification {
                    title: title.to_string(),
                    body: body.to_string(),
                },
                data,
            },
        };

        let response = self
            .http_client
            .post(self.send_url())
            .bearer_auth(&access_token)
            .json(&message)
            .send()
            .await
            .map_err(|e| FCMError::SendRequestError(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let fcm_response: FcmApiResponse = response
                .json()
                .await
                .map_err(|e| FCMError::ResponseParseError(e.to_string()))?;

            debug!(message_id = ?fcm_response.name, "FCM message accepted");
            Ok(FCMSendResult {
                device_token: device_token.to_string(),
                message_id: fcm_response.name,
                success: true,
                error: None,
            })
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(FCMError::ApiError(status.to_string(), error_text))
        }
    }

    /// OAuth2 access token for the service account, cached until near expiry.
    pub async fn get_access_token(&self) -> Result<String, FCMError> {
        let mut cache = self.token_cache.lock().await;
        if let Some(cached) = cache.as_ref() {
            if cached.expires_at > Utc::now().timestamp() + TOKEN_REFRESH_MARGIN_SECS {
                return Ok(cached.access_token.clone());
            }
        }

        let assertion = self.signed_assertion()?;
        let params = [
            ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
            ("assertion", assertion.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.credentials.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| FCMError::TokenError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FCMError::TokenRequestFailed(response.status().to_string()));
        }

        let token_response: GoogleTokenResponse = response
            .json()
            .await
            .map_err(|e| FCMError::TokenParseError(e.to_string()))?;

        *cache = Some(TokenCache {
            access_token: token_response.access_token.clone(),
            expires_at: Utc::now().timestamp() + token_response.expires_in,
        });

        Ok(token_response.access_token)
    }

    fn signed_assertion(&self) -> Result<String, FCMError> {
        let now = Utc::now();
        let claims = JwtClaims {
            iss: self.credentials.client_email.clone(),
            sub: self.credentials.client_email.clone(),
            scope: FCM_SCOPE.to_string(),
            aud: self.credentials.token_uri.clone(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
        };

        let encoding_key = EncodingKey::from_rsa_pem(self.credentials.private_key.as_bytes())
            .map_err(|e| FCMError::KeyParseError(e.to_string()))?;

        let mut header = Header::new(Algorithm::RS256);
        header.kid = Some(self.credentials.private_key_id.clone());

        encode(&header, &claims, &encoding_key).map_err(|e| FCMError::JwtEncodeError(e.to_string()))
    }
}
