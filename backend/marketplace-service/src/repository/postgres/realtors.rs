use async_trait::async_trait;
use error_types::{error_codes, ServiceError, ServiceResult};
use tracing::debug;
use uuid::Uuid;

use super::PostgresRepository;
use crate::models::{NewRealtor, Realtor};
use crate::repository::RealtorRepository;

#[async_trait]
impl RealtorRepository for PostgresRepository {
    async fn create_realtor(&self, realtor: NewRealtor) -> ServiceResult<Realtor> {
        let result = sqlx::query_as::<_, Realtor>(
            r#"
            INSERT INTO realtors (id, first_name, last_name, email, profile_image, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, NOW(), NOW())
            RETURNING id, first_name, last_name, email, profile_image, friends,
                      firebase_device_tokens, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&realtor.first_name)
        .bind(&realtor.last_name)
        .bind(&realtor.email)
        .bind(&realtor.profile_image)
        .fetch_one(self.pool())
        .await;

        match result {
            Ok(created) => {
                debug!(realtor_id = %created.id, "Created realtor");
                Ok(created)
            }
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(ServiceError::conflict(
                    error_codes::REALTOR_EMAIL_EXISTS,
                    format!("a realtor with email {} already exists", realtor.email),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn get_realtor(&self, id: Uuid) -> ServiceResult<Option<Realtor>> {
        let realtor = sqlx::query_as::<_, Realtor>(
            r#"
            SELECT id, first_name, last_name, email, profile_image, friends,
                   firebase_device_tokens, created_at, updated_at
            FROM realtors
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(realtor)
    }

    async fn add_device_token(
        &self,
        realtor_id: Uuid,
        token: &str,
    ) -> ServiceResult<Option<Vec<String>>> {
        let tokens: Option<Vec<String>> = sqlx::query_scalar(
            r#"
            UPDATE realtors
            SET firebase_device_tokens = CASE
                    WHEN $2 = ANY(firebase_device_tokens) THEN firebase_device_tokens
                    ELSE array_append(firebase_device_tokens, $2)
                END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING firebase_device_tokens
            "#,
        )
        .bind(realtor_id)
        .bind(token)
        .fetch_optional(self.pool())
        .await?;
        Ok(tokens)
    }

    async fn remove_device_token(&self, realtor_id: Uuid, token: &str) -> ServiceResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE realtors
            SET firebase_device_tokens = array_remove(firebase_device_tokens, $2),
                updated_at = NOW()
            WHERE id = $1 AND $2 = ANY(firebase_device_tokens)
            "#,
        )
        .bind(realtor_id)
        .bind(token)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
