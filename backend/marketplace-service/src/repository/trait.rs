use async_trait::async_trait;
use error_types::ServiceResult;
use uuid::Uuid;

use crate::models::*;

#[async_trait]
pub trait RealtorRepository: Send + Sync {
    /// Conflict (`REALTOR_EMAIL_EXISTS`) when the email is taken
    async fn create_realtor(&self, realtor: NewRealtor) -> ServiceResult<Realtor>;

    async fn get_realtor(&self, id: Uuid) -> ServiceResult<Option<Realtor>>;

    /// Add a device token unless already present.
    /// Returns the realtor's tokens, or `None` when the realtor does not exist.
    async fn add_device_token(
        &self,
        realtor_id: Uuid,
        token: &str,
    ) -> ServiceResult<Option<Vec<String>>>;

    /// Returns false when the realtor has no such token
    async fn remove_device_token(&self, realtor_id: Uuid, token: &str) -> ServiceResult<bool>;
}

/// Connection rows plus the `friends` arrays they keep in sync.
///
/// Every method that touches more than one row runs in a single transaction.
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    async fn get_connection(&self, id: Uuid) -> ServiceResult<Option<Connection>>;

    /// Connection between the pair in either direction
    async fn find_between(&self, a: Uuid, b: Uuid) -> ServiceResult<Option<Connection>>;

    async fn get_connection_with_realtors(
        &self,
        id: Uuid,
    ) -> ServiceResult<Option<ConnectionWithRealtors>>;

    async fn list_connections(
        &self,
        filter: &ConnectionFilter,
    ) -> ServiceResult<Vec<ConnectionWithRealtors>>;

    /// Insert a pending request. `None` when the pair already has a connection.
    async fn insert_request(&self, from_id: Uuid, to_id: Uuid)
        -> ServiceResult<Option<Connection>>;

    /// Set `connected` and add or remove each party from the other's friends.
    /// Friends are never duplicated. `None` when the connection does not exist.
    async fn set_connected(&self, id: Uuid, connected: bool)
        -> ServiceResult<Option<Connection>>;

    /// Prune both friends lists, delete the connection's messages and the row.
    /// Returns the removed connection.
    async fn delete_connection(&self, id: Uuid) -> ServiceResult<Option<Connection>>;
}

#[async_trait]
pub trait BlockRepository: Send + Sync {
    /// Insert the block and remove any connection between the pair.
    /// `None` when `from` already blocks `to`.
    async fn create_block(&self, from: Uuid, to: Uuid) -> ServiceResult<Option<Block>>;

    async fn delete_block(&self, from: Uuid, to: Uuid) -> ServiceResult<bool>;

    async fn is_blocked(&self, blocker: Uuid, blocked: Uuid) -> ServiceResult<bool>;

    async fn list_blocked(&self, from: Uuid, page: Pagination) -> ServiceResult<Vec<Block>>;

    /// Either realtor blocks the other
    async fn has_block_between(&self, a: Uuid, b: Uuid) -> ServiceResult<bool> {
        Ok(self.is_blocked(a, b).await? || self.is_blocked(b, a).await?)
    }
}

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Forbidden when either party blocks the other at insert time
    async fn create_notification(&self, notification: NewNotification)
        -> ServiceResult<Notification>;

    /// Newest first
    async fn list_notifications(
        &self,
        receiver_id: Uuid,
        page: Pagination,
    ) -> ServiceResult<Vec<Notification>>;

    async fn mark_notification_read(&self, id: Uuid, receiver_id: Uuid) -> ServiceResult<bool>;

    async fn delete_notification(&self, id: Uuid, receiver_id: Uuid) -> ServiceResult<bool>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert_message(&self, message: NewMessage) -> ServiceResult<Message>;

    /// Oldest first
    async fn list_messages(
        &self,
        connection_id: Uuid,
        page: Pagination,
    ) -> ServiceResult<Vec<Message>>;

    async fn mark_message_read(&self, id: Uuid) -> ServiceResult<Option<Message>>;

    async fn delete_messages_for_connection(&self, connection_id: Uuid) -> ServiceResult<u64>;
}

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create_job(&self, job: NewJob) -> ServiceResult<Job>;

    async fn get_job(&self, id: Uuid) -> ServiceResult<Option<Job>>;

    async fn get_job_with_owner(&self, id: Uuid) -> ServiceResult<Option<JobWithOwner>>;

    /// Newest first
    async fn list_jobs(&self, page: Pagination) -> ServiceResult<Vec<Job>>;

    /// Returns false when the applicant is already listed
    async fn add_applicant(&self, job_id: Uuid, applicant_id: Uuid) -> ServiceResult<bool>;
}

#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    async fn create_feedback(&self, feedback: NewFeedback) -> ServiceResult<Feedback>;

    /// Newest first
    async fn list_feedback(
        &self,
        to_realtor: Uuid,
        page: Pagination,
    ) -> ServiceResult<Vec<Feedback>>;
}
