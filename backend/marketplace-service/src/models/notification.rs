use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::UnknownVariant;

/// Domain event that produces a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationEvent {
    ConnectionRequest,
    ConnectionAccepted,
    Message,
    /// The receiver id carried with this event is a job id, not a realtor id
    AppliedJob,
    Feedback,
}

impl NotificationEvent {
    pub const ALL: [NotificationEvent; 5] = [
        NotificationEvent::ConnectionRequest,
        NotificationEvent::ConnectionAccepted,
        NotificationEvent::Message,
        NotificationEvent::AppliedJob,
        NotificationEvent::Feedback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationEvent::ConnectionRequest => "connectionRequest",
            NotificationEvent::ConnectionAccepted => "connectionAccepted",
            NotificationEvent::Message => "message",
            NotificationEvent::AppliedJob => "appliedJob",
            NotificationEvent::Feedback => "feedback",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            NotificationEvent::ConnectionRequest => "New Connection Request",
            NotificationEvent::ConnectionAccepted => "Connection Accepted",
            NotificationEvent::Message => "New Message",
            NotificationEvent::AppliedJob => "New Job Application",
            NotificationEvent::Feedback => "New Feedback",
        }
    }

    pub fn body(&self, sender_name: &str) -> String {
        match self {
            NotificationEvent::ConnectionRequest => {
                format!("{sender_name} wants to connect with you")
            }
            NotificationEvent::ConnectionAccepted => {
                format!("{sender_name} accepted your connection request")
            }
            NotificationEvent::Message => format!("{sender_name} sent you a message"),
            NotificationEvent::AppliedJob => format!("{sender_name} applied to your job"),
            NotificationEvent::Feedback => format!("{sender_name} left you feedback"),
        }
    }

    pub fn receiver_is_job(&self) -> bool {
        matches!(self, NotificationEvent::AppliedJob)
    }
}

impl fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationEvent {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "notification type",
                value: s.to_string(),
            })
    }
}

/// In-app notification row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub notification_type: NotificationEvent,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl<'r> FromRow<'r, PgRow> for Notification {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let notification_type: String = row.try_get("notification_type")?;
        Ok(Self {
            id: row.try_get("id")?,
            sender_id: row.try_get("sender_id")?,
            receiver_id: row.try_get("receiver_id")?,
            notification_type: notification_type
                .parse()
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            title: row.try_get("title")?,
            message: row.try_get("message")?,
            is_read: row.try_get("is_read")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub sender_id: Uuid,
    /// Always a realtor id; job events are resolved to the owner before this point
    pub receiver_id: Uuid,
    pub notification_type: NotificationEvent,
    pub title: String,
    pub message: String,
}
