use error_types::{error_codes, ServiceError, ServiceResult};
use tracing::info;
use uuid::Uuid;

use super::require_realtor;
use crate::models::{Block, Pagination, RelationshipStatus};
use crate::repository::Repositories;

pub struct BlockService {
    repos: Repositories,
}

impl BlockService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Block `to` on behalf of `from`, dropping any connection between them.
    pub async fn block(&self, from: Uuid, to: Uuid) -> ServiceResult<Block> {
        if from == to {
            return Err(ServiceError::BadRequest(
                "cannot block yourself".to_string(),
            ));
        }

        require_realtor(&self.repos, from).await?;
        require_realtor(&self.repos, to).await?;

        let block = self
            .repos
            .blocks
            .create_block(from, to)
            .await?
            .ok_or_else(|| {
                ServiceError::conflict(error_codes::ALREADY_BLOCKED, "realtor already blocked")
            })?;

        info!(blocker = %from, blocked = %to, "Realtor blocked");
        Ok(block)
    }

    pub async fn unblock(&self, from: Uuid, to: Uuid) -> ServiceResult<()> {
        if !self.repos.blocks.delete_block(from, to).await? {
            return Err(ServiceError::NotFound(format!("block from {from} to {to}")));
        }
        info!(blocker = %from, unblocked = %to, "Realtor unblocked");
        Ok(())
    }

    pub async fn list_blocked(&self, from: Uuid, page: Pagination) -> ServiceResult<Vec<Block>> {
        self.repos.blocks.list_blocked(from, page).await
    }

    pub async fn relationship_status(
        &self,
        realtor_id: Uuid,
        other_id: Uuid,
    ) -> ServiceResult<RelationshipStatus> {
        let connection = self
            .repos
            .connections
            .find_between(realtor_id, other_id)
            .await?;

        Ok(RelationshipStatus {
            connected: connection.as_ref().is_some_and(|c| c.connected),
            pending: connection.as_ref().is_some_and(|c| !c.connected),
            is_blocked: self.repos.blocks.is_blocked(other_id, realtor_id).await?,
            is_blocking: self.repos.blocks.is_blocked(realtor_id, other_id).await?,
        })
    }
}
