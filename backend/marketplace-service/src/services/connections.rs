//! Connection lifecycle: request, accept or revoke, delete.
//!
//! Both realtors' `friends` arrays follow the connection state. The repository
//! applies each change together with the row update in one transaction.

use error_types::{error_codes, ServiceError, ServiceResult};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{require_realtor, NotificationDispatcher};
use crate::models::{
    Connection, ConnectionFilter, ConnectionUpdate, ConnectionWithRealtors, NotificationEvent,
};
use crate::repository::Repositories;

pub struct ConnectionService {
    repos: Repositories,
    dispatcher: Arc<NotificationDispatcher>,
}

impl ConnectionService {
    pub fn new(repos: Repositories, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { repos, dispatcher }
    }

    pub async fn create_request(&self, from_id: Uuid, to_id: Uuid) -> ServiceResult<Connection> {
        if from_id == to_id {
            return Err(ServiceError::BadRequest(
                "cannot send a connection request to yourself".to_string(),
            ));
        }

        require_realtor(&self.repos, from_id).await?;
        require_realtor(&self.repos, to_id).await?;

        if self.repos.blocks.has_block_between(from_id, to_id).await? {
            return Err(ServiceError::Forbidden(
                "connection not allowed between these realtors".to_string(),
            ));
        }

        if self
            .repos
            .connections
            .find_between(from_id, to_id)
            .await?
            .is_some()
        {
            return Err(connection_exists());
        }

        let connection = self
            .repos
            .connections
            .insert_request(from_id, to_id)
            .await?
            .ok_or_else(connection_exists)?;

        info!(connection_id = %connection.id, %from_id, %to_id, "Connection requested");
        self.dispatcher
            .dispatch_detached(from_id, to_id, NotificationEvent::ConnectionRequest);

        Ok(connection)
    }

    /// Accept (`connected = true`) or revoke a request between `from_id` and `to_id`.
    pub async fn update_request(
        &self,
        from_id: Uuid,
        to_id: Uuid,
        update: ConnectionUpdate,
    ) -> ServiceResult<Connection> {
        let existing = self
            .repos
            .connections
            .find_between(from_id, to_id)
            .await?
            .ok_or_else(|| connection_not_found(from_id, to_id))?;

        let updated = self
            .repos
            .connections
            .set_connected(existing.id, update.connected)
            .await?
            .ok_or_else(|| connection_not_found(from_id, to_id))?;

        info!(
            connection_id = %updated.id,
            connected = updated.connected,
            "Connection updated"
        );

        if update.connected && !existing.connected {
            // The stored direction decides who requested, whatever order the caller used
            self.dispatcher.dispatch_detached(
                existing.to_id,
                existing.from_id,
                NotificationEvent::ConnectionAccepted,
            );
        }

        Ok(updated)
    }

    pub async fn delete_request(&self, id: Uuid) -> ServiceResult<Connection> {
        let deleted = self
            .repos
            .connections
            .delete_connection(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("connection {id}")))?;

        info!(connection_id = %id, "Connection deleted");
        Ok(deleted)
    }

    pub async fn get_all(
        &self,
        filter: &ConnectionFilter,
    ) -> ServiceResult<Vec<ConnectionWithRealtors>> {
        self.repos.connections.list_connections(filter).await
    }

    pub async fn get_by_id(&self, id: Uuid) -> ServiceResult<ConnectionWithRealtors> {
        self.repos
            .connections
            .get_connection_with_realtors(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("connection {id}")))
    }
}

fn connection_exists() -> ServiceError {
    ServiceError::conflict(
        error_codes::CONNECTION_EXISTS,
        "a connection between these realtors already exists",
    )
}

fn connection_not_found(a: Uuid, b: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("connection between {a} and {b}"))
}
