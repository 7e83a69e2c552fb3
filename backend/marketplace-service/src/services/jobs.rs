use error_types::{error_codes, ServiceError, ServiceResult};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{require_realtor, NotificationDispatcher};
use crate::models::{Job, JobWithOwner, NewJob, NotificationEvent, Pagination};
use crate::repository::Repositories;

pub struct JobService {
    repos: Repositories,
    dispatcher: Arc<NotificationDispatcher>,
}

impl JobService {
    pub fn new(repos: Repositories, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { repos, dispatcher }
    }

    pub async fn create_job(&self, mut job: NewJob) -> ServiceResult<Job> {
        job.title = job.title.trim().to_string();
        if job.title.is_empty() {
            return Err(ServiceError::ValidationError(
                "title must not be empty".to_string(),
            ));
        }
        if job.price.is_some_and(|price| !price.is_finite() || price < 0.0) {
            return Err(ServiceError::ValidationError(
                "price must be a non-negative number".to_string(),
            ));
        }

        require_realtor(&self.repos, job.owner_id).await?;

        let created = self.repos.jobs.create_job(job).await?;
        info!(job_id = %created.id, owner_id = %created.owner_id, "Job created");
        Ok(created)
    }

    pub async fn get_job(&self, id: Uuid) -> ServiceResult<JobWithOwner> {
        self.repos
            .jobs
            .get_job_with_owner(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("job {id}")))
    }

    pub async fn list_jobs(&self, page: Pagination) -> ServiceResult<Vec<Job>> {
        self.repos.jobs.list_jobs(page).await
    }

    /// Add the applicant and notify the job owner.
    pub async fn apply_to_job(&self, job_id: Uuid, applicant_id: Uuid) -> ServiceResult<Job> {
        let job = self
            .repos
            .jobs
            .get_job(job_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("job {job_id}")))?;

        if job.owner_id == applicant_id {
            return Err(ServiceError::BadRequest(
                "cannot apply to your own job".to_string(),
            ));
        }

        require_realtor(&self.repos, applicant_id).await?;

        if !self.repos.jobs.add_applicant(job_id, applicant_id).await? {
            return Err(ServiceError::conflict(
                error_codes::ALREADY_APPLIED,
                "already applied to this job",
            ));
        }

        info!(%job_id, %applicant_id, "Applied to job");
        self.dispatcher
            .dispatch_detached(applicant_id, job_id, NotificationEvent::AppliedJob);

        self.repos
            .jobs
            .get_job(job_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("job {job_id}")))
    }
}
