use error_types::{ServiceError, ServiceResult};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::NotificationDispatcher;
use crate::models::{
    Message, MessageType, NewMessage, NotificationEvent, Pagination, MAX_MESSAGE_LEN,
};
use crate::repository::Repositories;

pub struct MessageService {
    repos: Repositories,
    dispatcher: Arc<NotificationDispatcher>,
}

impl MessageService {
    pub fn new(repos: Repositories, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { repos, dispatcher }
    }

    /// Send over an accepted connection; the receiver is the other party.
    pub async fn send_message(
        &self,
        sender_id: Uuid,
        connection_id: Uuid,
        message: &str,
        message_type: MessageType,
    ) -> ServiceResult<Message> {
        if message.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "message must not be empty".to_string(),
            ));
        }
        if message.chars().count() > MAX_MESSAGE_LEN {
            return Err(ServiceError::ValidationError(format!(
                "message exceeds {MAX_MESSAGE_LEN} characters"
            )));
        }

        let connection = self
            .repos
            .connections
            .get_connection(connection_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("connection {connection_id}")))?;

        let receiver_id = connection.other_party(sender_id).ok_or_else(|| {
            ServiceError::Forbidden("sender is not part of this connection".to_string())
        })?;

        if !connection.connected {
            return Err(ServiceError::Forbidden(
                "connection has not been accepted".to_string(),
            ));
        }

        if self
            .repos
            .blocks
            .has_block_between(sender_id, receiver_id)
            .await?
        {
            return Err(ServiceError::Forbidden(
                "messaging not allowed between these realtors".to_string(),
            ));
        }

        let sent = self
            .repos
            .messages
            .insert_message(NewMessage {
                sender_id,
                receiver_id,
                connection_id,
                message: message.to_string(),
                message_type,
            })
            .await?;

        info!(message_id = %sent.id, %connection_id, "Message sent");
        self.dispatcher
            .dispatch_detached(sender_id, receiver_id, NotificationEvent::Message);

        Ok(sent)
    }

    pub async fn list_messages(
        &self,
        connection_id: Uuid,
        page: Pagination,
    ) -> ServiceResult<Vec<Message>> {
        self.repos.messages.list_messages(connection_id, page).await
    }

    pub async fn mark_read(&self, message_id: Uuid) -> ServiceResult<Message> {
        self.repos
            .messages
            .mark_message_read(message_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("message {message_id}")))
    }

    pub async fn delete_messages_for_connection(&self, connection_id: Uuid) -> ServiceResult<u64> {
        let deleted = self
            .repos
            .messages
            .delete_messages_for_connection(connection_id)
            .await?;
        info!(%connection_id, deleted, "Messages deleted for connection");
        Ok(deleted)
    }
}
