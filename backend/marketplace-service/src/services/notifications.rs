use error_types::{ServiceError, ServiceResult};
use uuid::Uuid;

use crate::models::{Notification, Pagination};
use crate::repository::Repositories;

/// Read side of the in-app notifications written by the dispatcher.
pub struct NotificationInbox {
    repos: Repositories,
}

impl NotificationInbox {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn list_notifications(
        &self,
        receiver_id: Uuid,
        page: Pagination,
    ) -> ServiceResult<Vec<Notification>> {
        self.repos
            .notifications
            .list_notifications(receiver_id, page)
            .await
    }

    pub async fn mark_notification_read(&self, id: Uuid, receiver_id: Uuid) -> ServiceResult<()> {
        if !self
            .repos
            .notifications
            .mark_notification_read(id, receiver_id)
            .await?
        {
            return Err(ServiceError::NotFound(format!("notification {id}")));
        }
        Ok(())
    }

    pub async fn delete_notification(&self, id: Uuid, receiver_id: Uuid) -> ServiceResult<()> {
        if !self
            .repos
            .notifications
            .delete_notification(id, receiver_id)
            .await?
        {
            return Err(ServiceError::NotFound(format!("notification {id}")));
        }
        Ok(())
    }
}
