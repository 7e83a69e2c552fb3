//! PostgreSQL-backed repositories.
//!
//! One [`PostgresRepository`] implements every repository trait; the impls are
//! split per aggregate. Friend-list changes are single server-side `UPDATE`s
//! executed inside the caller's transaction.

mod blocks;
mod connections;
mod feedback;
mod jobs;
mod messages;
mod notifications;
mod realtors;

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::Connection;

#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Append each id to the other's friends unless it is already there.
pub(super) async fn add_friends(
    conn: &mut PgConnection,
    a: Uuid,
    b: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE realtors
        SET friends = CASE WHEN id = $1 THEN array_append(friends, $2)
                           ELSE array_append(friends, $1) END,
            updated_at = NOW()
        WHERE (id = $1 AND NOT ($2 = ANY(friends)))
           OR (id = $2 AND NOT ($1 = ANY(friends)))
        "#,
    )
    .bind(a)
    .bind(b)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub(super) async fn remove_friends(
    conn: &mut PgConnection,
    a: Uuid,
    b: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE realtors
        SET friends = CASE WHEN id = $1 THEN array_remove(friends, $2)
                           ELSE array_remove(friends, $1) END,
            updated_at = NOW()
        WHERE id IN ($1, $2)
        "#,
    )
    .bind(a)
    .bind(b)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Unfriend the pair, then drop the connection's messages and the row itself.
pub(super) async fn remove_connection(
    conn: &mut PgConnection,
    connection: &Connection,
) -> Result<u64, sqlx::Error> {
    remove_friends(&mut *conn, connection.from_id, connection.to_id).await?;

    let messages = sqlx::query("DELETE FROM messages WHERE connection_id = $1")
        .bind(connection.id)
        .execute(&mut *conn)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM connections WHERE id = $1")
        .bind(connection.id)
        .execute(&mut *conn)
        .await?;

    Ok(messages)
}
