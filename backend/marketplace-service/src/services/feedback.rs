use error_types::{ServiceError, ServiceResult};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use super::{require_realtor, NotificationDispatcher};
use crate::models::{Feedback, NewFeedback, NotificationEvent, Pagination};
use crate::repository::Repositories;

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 5;

pub struct FeedbackService {
    repos: Repositories,
    dispatcher: Arc<NotificationDispatcher>,
}

impl FeedbackService {
    pub fn new(repos: Repositories, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { repos, dispatcher }
    }

    pub async fn give_feedback(&self, feedback: NewFeedback) -> ServiceResult<Feedback> {
        if !(MIN_RATING..=MAX_RATING).contains(&feedback.rating) {
            return Err(ServiceError::BadRequest(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}"
            )));
        }
        if feedback.from_realtor == feedback.to_realtor {
            return Err(ServiceError::BadRequest(
                "cannot leave feedback for yourself".to_string(),
            ));
        }

        require_realtor(&self.repos, feedback.from_realtor).await?;
        require_realtor(&self.repos, feedback.to_realtor).await?;

        if let Some(job_id) = feedback.job_id {
            if self.repos.jobs.get_job(job_id).await?.is_none() {
                return Err(ServiceError::NotFound(format!("job {job_id}")));
            }
        }

        let created = self.repos.feedback.create_feedback(feedback).await?;
        info!(
            feedback_id = %created.id,
            from = %created.from_realtor,
            to = %created.to_realtor,
            rating = created.rating,
            "Feedback given"
        );
        self.dispatcher.dispatch_detached(
            created.from_realtor,
            created.to_realtor,
            NotificationEvent::Feedback,
        );

        Ok(created)
    }

    pub async fn list_feedback(
        &self,
        to_realtor: Uuid,
        page: Pagination,
    ) -> ServiceResult<Vec<Feedback>> {
        self.repos.feedback.list_feedback(to_realtor, page).await
    }
}
