use async_trait::async_trait;
use error_types::ServiceResult;
use tracing::debug;
use uuid::Uuid;

use super::{remove_connection, PostgresRepository};
use crate::models::{Block, Connection, Pagination};
use crate::repository::BlockRepository;

#[async_trait]
impl BlockRepository for PostgresRepository {
    async fn create_block(&self, from: Uuid, to: Uuid) -> ServiceResult<Option<Block>> {
        let mut tx = self.pool().begin().await?;

        let inserted = sqlx::query_as::<_, Block>(
            r#"
            INSERT INTO blocks (id, from_realtor, to_realtor, created_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (from_realtor, to_realtor) DO NOTHING
            RETURNING id, from_realtor, to_realtor, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(from)
        .bind(to)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(block) = inserted else {
            return Ok(None);
        };

        let connection = sqlx::query_as::<_, Connection>(
            r#"
            SELECT id, from_id, to_id, connected, created_at, updated_at
            FROM connections
            WHERE (from_id = $1 AND to_id = $2) OR (from_id = $2 AND to_id = $1)
            FOR UPDATE
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(connection) = &connection {
            remove_connection(&mut tx, connection).await?;
        }

        tx.commit().await?;

        debug!(
            blocker = %from,
            blocked = %to,
            removed_connection = ?connection.map(|c| c.id),
            "Created block"
        );
        Ok(Some(block))
    }

    async fn delete_block(&self, from: Uuid, to: Uuid) -> ServiceResult<bool> {
        let result = sqlx::query("DELETE FROM blocks WHERE from_realtor = $1 AND to_realtor = $2")
            .bind(from)
            .bind(to)
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn is_blocked(&self, blocker: Uuid, blocked: Uuid) -> ServiceResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM blocks WHERE from_realtor = $1 AND to_realtor = $2)",
        )
        .bind(blocker)
        .bind(blocked)
        .fetch_one(self.pool())
        .await?;
        Ok(exists)
    }

    async fn list_blocked(&self, from: Uuid, page: Pagination) -> ServiceResult<Vec<Block>> {
        let blocks = sqlx::query_as::<_, Block>(
            r#"
            SELECT id, from_realtor, to_realtor, created_at
            FROM blocks
            WHERE from_realtor = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(from)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool())
        .await?;
        Ok(blocks)
    }

    async fn has_block_between(&self, a: Uuid, b: Uuid) -> ServiceResult<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM blocks
                WHERE (from_realtor = $1 AND to_realtor = $2)
                   OR (from_realtor = $2 AND to_realtor = $1)
            )
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_one(self.pool())
        .await?;
        Ok(exists)
    }
}
