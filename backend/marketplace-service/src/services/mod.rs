pub mod blocks;
pub mod connections;
pub mod dispatcher;
pub mod feedback;
pub mod jobs;
pub mod messages;
pub mod notifications;
pub mod push;
pub mod realtors;

pub use blocks::BlockService;
pub use connections::ConnectionService;
pub use dispatcher::{DispatchOutcome, NotificationDispatcher, DEFAULT_PUSH_TIMEOUT};
pub use feedback::FeedbackService;
pub use jobs::JobService;
pub use messages::MessageService;
pub use notifications::NotificationInbox;
pub use push::{FcmPushProvider, PushError, PushProvider};
pub use realtors::RealtorService;

use error_types::{ServiceError, ServiceResult};
use uuid::Uuid;

use crate::models::Realtor;
use crate::repository::Repositories;

pub(crate) async fn require_realtor(repos: &Repositories, id: Uuid) -> ServiceResult<Realtor> {
    repos
        .realtors
        .get_realtor(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("realtor {id}")))
}
