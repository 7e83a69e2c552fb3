use async_trait::async_trait;
use error_types::ServiceResult;
use tracing::debug;
use uuid::Uuid;

use super::PostgresRepository;
use crate::models::{Job, JobWithOwner, NewJob, Pagination};
use crate::repository::{JobRepository, RealtorRepository};

#[async_trait]
impl JobRepository for PostgresRepository {
    async fn create_job(&self, job: NewJob) -> ServiceResult<Job> {
        let created = sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (id, owner_id, title, description, location, price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW(), NOW())
            RETURNING id, owner_id, title, description, location, price, applicants,
                      created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(job.owner_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.location)
        .bind(job.price)
        .fetch_one(self.pool())
        .await?;

        debug!(job_id = %created.id, owner_id = %created.owner_id, "Created job");
        Ok(created)
    }

    async fn get_job(&self, id: Uuid) -> ServiceResult<Option<Job>> {
        let job = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, owner_id, title, description, location, price, applicants,
                   created_at, updated_at
            FROM jobs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;
        Ok(job)
    }

    async fn get_job_with_owner(&self, id: Uuid) -> ServiceResult<Option<JobWithOwner>> {
        let Some(job) = self.get_job(id).await? else {
            return Ok(None);
        };
        // owner_id is a foreign key, so a missing owner means the row vanished concurrently
        let owner = self.get_realtor(job.owner_id).await?;
        Ok(owner.map(|owner| JobWithOwner { job, owner }))
    }

    async fn list_jobs(&self, page: Pagination) -> ServiceResult<Vec<Job>> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT id, owner_id, title, description, location, price, applicants,
                   created_at, updated_at
            FROM jobs
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.pool())
        .await?;
        Ok(jobs)
    }

    async fn add_applicant(&self, job_id: Uuid, applicant_id: Uuid) -> ServiceResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET applicants = array_append(applicants, $2), updated_at = NOW()
            WHERE id = $1 AND NOT ($2 = ANY(applicants))
            "#,
        )
        .bind(job_id)
        .bind(applicant_id)
        .execute(self.pool())
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
