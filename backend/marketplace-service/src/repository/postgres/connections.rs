use async_trait::async_trait;
use error_types::ServiceResult;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use tracing::debug;
use uuid::Uuid;

use super::{add_friends, remove_connection, remove_friends, PostgresRepository};
use crate::models::{Connection, ConnectionFilter, ConnectionWithRealtors, RealtorSummary};
use crate::repository::ConnectionRepository;

const SELECT_WITH_REALTORS: &str = r#"
    SELECT c.id, c.from_id, c.to_id, c.connected, c.created_at, c.updated_at,
           f.first_name AS from_first_name, f.last_name AS from_last_name,
           f.profile_image AS from_profile_image,
           t.first_name AS to_first_name, t.last_name AS to_last_name,
           t.profile_image AS to_profile_image
    FROM connections c
    JOIN realtors f ON f.id = c.from_id
    JOIN realtors t ON t.id = c.to_id
"#;

fn with_realtors_from_row(row: &PgRow) -> Result<ConnectionWithRealtors, sqlx::Error> {
    let connection = Connection::from_row(row)?;
    Ok(ConnectionWithRealtors {
        from_realtor: RealtorSummary {
            id: connection.from_id,
            first_name: row.try_get("from_first_name")?,
            last_name: row.try_get("from_last_name")?,
            profile_image: row.try_get("from_profile_image")?,
        },
        to_realtor: RealtorSummary {
            id: connection.to_id,
            first_name: row.try_get("to_first_name")?,
            last_name: row.try_get("to_last_name")?,
            profile_image: row.try_get("to_profile_image")?,
        },
        connection,
    })
}

#[async_trait]
impl ConnectionRepository for PostgresRepository {
    async fn get_connection(&self, id: Uuid) -> ServiceResult<Option<Connection>> {
        let connection = sqlx::query_as::<_, Connection>(
            r#"
            SELECT id, from_id, to_id, connected, created_at, updated_at
            FROM connections
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(connection)
    }

    async fn find_between(&self, a: Uuid, b: Uuid) -> ServiceResult<Option<Connection>> {
        let connection = sqlx::query_as::<_, Connection>(
            r#"
            SELECT id, from_id, to_id, connected, created_at, updated_at
            FROM connections
            WHERE (from_id = $1 AND to_id = $2) OR (from_id = $2 AND to_id = $1)
            "#,
        )
        .bind(a)
        .bind(b)
        .fetch_optional(self.pool())
        .await?;
        Ok(connection)
    }

    async fn get_connection_with_realtors(
        &self,
        id: Uuid,
    ) -> ServiceResult<Option<ConnectionWithRealtors>> {
        let query = format!("{SELECT_WITH_REALTORS} WHERE c.id = $1");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(self.pool())
            .await?;

        Ok(row.as_ref().map(with_realtors_from_row).transpose()?)
    }

    async fn list_connections(
        &self,
        filter: &ConnectionFilter,
    ) -> ServiceResult<Vec<ConnectionWithRealtors>> {
        let page = filter.page();
        let query = format!(
            r#"{SELECT_WITH_REALTORS}
            WHERE ($1::uuid IS NULL OR c.from_id = $1 OR c.to_id = $1)
              AND ($2::boolean IS NULL OR c.connected = $2)
            ORDER BY c.created_at DESC
            LIMIT $3 OFFSET $4"#
        );

        let rows = sqlx::query(&query)
            .bind(filter.realtor_id)
            .bind(filter.connected)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.pool())
            .await?;

        Ok(rows
            .iter()
            .map(with_realtors_from_row)
            .collect::<Result<Vec<_>, _>>()?)
    }

    async fn insert_request(
        &self,
        from_id: Uuid,
        to_id: Uuid,
    ) -> ServiceResult<Option<Connection>> {
        // The pair index rejects a second row for the same realtors in either order.
        let connection = sqlx::query_as::<_, Connection>(
            r#"
            INSERT INTO connections (id, from_id, to_id, connected, created_at, updated_at)
            VALUES ($1, $2, $3, FALSE, NOW(), NOW())
            ON CONFLICT DO NOTHING
            RETURNING id, from_id, to_id, connected, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(from_id)
        .bind(to_id)
        .fetch_optional(self.pool())
        .await?;

        if let Some(created) = &connection {
            debug!(connection_id = %created.id, %from_id, %to_id, "Created connection request");
        }
        Ok(connection)
    }

    async fn set_connected(
        &self,
        id: Uuid,
        connected: bool,
    ) -> ServiceResult<Option<Connection>> {
        let mut tx = self.pool().begin().await?;

        let updated = sqlx::query_as::<_, Connection>(
            r#"
            UPDATE connections
            SET connected = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, from_id, to_id, connected, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(connected)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(connection) = updated else {
            return Ok(None);
        };

        if connected {
            add_friends(&mut tx, connection.from_id, connection.to_id).await?;
        } else {
            remove_friends(&mut tx, connection.from_id, connection.to_id).await?;
        }

        tx.commit().await?;

        debug!(connection_id = %id, connected, "Updated connection and synced friends");
        Ok(Some(connection))
    }

    async fn delete_connection(&self, id: Uuid) -> ServiceResult<Option<Connection>> {
        let mut tx = self.pool().begin().await?;

        let existing = sqlx::query_as::<_, Connection>(
            r#"
            SELECT id, from_id, to_id, connected, created_at, updated_at
            FROM connections
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(connection) = existing else {
            return Ok(None);
        };

        let messages = remove_connection(&mut tx, &connection).await?;
        tx.commit().await?;

        debug!(connection_id = %id, messages_deleted = messages, "Deleted connection");
        Ok(Some(connection))
    }
}
