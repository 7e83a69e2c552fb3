use async_trait::async_trait;
use error_types::ServiceResult;
use uuid::Uuid;

use super::PostgresRepository;
use crate::models::{Feedback, NewFeedback, Pagination};
use crate::repository::FeedbackRepository;

#[async_trait]
impl FeedbackRepository for PostgresRepository {
    async fn create_feedback(&self, feedback: NewFeedback) -> ServiceResult<Feedback> {
        let created = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (id, from_realtor, to_realtor, job_id, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING id, from_realtor, to_realtor, job_id, rating, comment, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(feedback.from_realtor)
        .bind(feedback.to_realtor)
        .bind(feedback.job_id)
        .bind(feedback.rating)
        .bind(&feedback.comment)
        .fetch_one(self.pool())
        .await?;
        Ok(created)
    }

    async fn list_feedback(
        &self,
        to_realtor: Uuid,
        page: Pagination,
    ) -> ServiceResult<Vec<Feedback>> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            SELECT id, from_realtor, to_realtor, job_id, rating, comment, created_at
            FROM feedback
            WHERE to_realtor = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(to_realtor)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool())
        .await?;
        Ok(feedback)
    }
}
