use async_trait::async_trait;
use error_types::{ServiceError, ServiceResult};
use uuid::Uuid;

use super::PostgresRepository;
use crate::models::{NewNotification, Notification, Pagination};
use crate::repository::NotificationRepository;

#[async_trait]
impl NotificationRepository for PostgresRepository {
    async fn create_notification(
        &self,
        notification: NewNotification,
    ) -> ServiceResult<Notification> {
        // The block check and the insert are one statement.
        let created = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications
                (id, sender_id, receiver_id, notification_type, title, message, is_read, created_at)
            SELECT $1::uuid, $2::uuid, $3::uuid, $4::varchar, $5::varchar, $6::text, FALSE, NOW()
            WHERE NOT EXISTS (
                SELECT 1 FROM blocks
                WHERE (from_realtor = $2 AND to_realtor = $3)
                   OR (from_realtor = $3 AND to_realtor = $2)
            )
            RETURNING id, sender_id, receiver_id, notification_type, title, message,
                      is_read, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(notification.sender_id)
        .bind(notification.receiver_id)
        .bind(notification.notification_type.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .fetch_optional(self.pool())
        .await?;

        created.ok_or_else(|| {
            ServiceError::Forbidden("notification blocked between sender and receiver".to_string())
        })
    }

    async fn list_notifications(
        &self,
        receiver_id: Uuid,
        page: Pagination,
    ) -> ServiceResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(
            r#"
            SELECT id, sender_id, receiver_id, notification_type, title, message,
                   is_read, created_at
            FROM notifications
            WHERE receiver_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(receiver_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool())
        .await?;
        Ok(notifications)
    }

    async fn mark_notification_read(&self, id: Uuid, receiver_id: Uuid) -> ServiceResult<bool> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = TRUE WHERE id = $1 AND receiver_id = $2")
                .bind(id)
                .bind(receiver_id)
                .execute(self.pool())
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_notification(&self, id: Uuid, receiver_id: Uuid) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND receiver_id = $2")
            .bind(id)
            .bind(receiver_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
