/// Firebase Cloud Messaging client
///
/// Sends push notifications through the FCM HTTP v1 API:
/// - OAuth2 access tokens minted from a Google service account, cached until
///   shortly before expiry
/// - single-device sends
/// - device token format checks

pub mod client;
pub mod errors;
pub mod models;

pub use client::FCMClient;
pub use errors::FCMError;
pub use models::{FCMSendResult, ServiceAccountKey};
