use async_trait::async_trait;
use error_types::ServiceResult;
use uuid::Uuid;

use super::PostgresRepository;
use crate::models::{Message, MessageStatus, NewMessage, Pagination};
use crate::repository::MessageRepository;

#[async_trait]
impl MessageRepository for PostgresRepository {
    async fn insert_message(&self, message: NewMessage) -> ServiceResult<Message> {
        let created = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages
                (id, sender_id, receiver_id, connection_id, message, message_type, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING id, sender_id, receiver_id, connection_id, message, message_type,
                      status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(message.sender_id)
        .bind(message.receiver_id)
        .bind(message.connection_id)
        .bind(&message.message)
        .bind(message.message_type.as_str())
        .bind(MessageStatus::Sent.as_str())
        .fetch_one(self.pool())
        .await?;
        Ok(created)
    }

    async fn list_messages(
        &self,
        connection_id: Uuid,
        page: Pagination,
    ) -> ServiceResult<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, sender_id, receiver_id, connection_id, message, message_type,
                   status, created_at
            FROM messages
            WHERE connection_id = $1
            ORDER BY created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(connection_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool())
        .await?;
        Ok(messages)
    }

    async fn mark_message_read(&self, id: Uuid) -> ServiceResult<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            UPDATE messages SET status = $2
            WHERE id = $1
            RETURNING id, sender_id, receiver_id, connection_id, message, message_type,
                      status, created_at
            "#,
        )
        .bind(id)
        .bind(MessageStatus::Read.as_str())
        .fetch_optional(self.pool())
        .await?;
        Ok(message)
    }

    async fn delete_messages_for_connection(&self, connection_id: Uuid) -> ServiceResult<u64> {
        let result = sqlx::query("DELETE FROM messages WHERE connection_id = $1")
            .bind(connection_id)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected())
    }
}
