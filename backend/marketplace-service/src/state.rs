use std::sync::Arc;
use std::time::Duration;

use crate::repository::Repositories;
use crate::services::{
    BlockService, ConnectionService, FeedbackService, JobService, MessageService,
    NotificationDispatcher, NotificationInbox, PushProvider, RealtorService,
};

/// Services shared by every HTTP worker.
#[derive(Clone)]
pub struct AppState {
    pub realtors: Arc<RealtorService>,
    pub connections: Arc<ConnectionService>,
    pub blocks: Arc<BlockService>,
    pub messages: Arc<MessageService>,
    pub jobs: Arc<JobService>,
    pub feedback: Arc<FeedbackService>,
    pub inbox: Arc<NotificationInbox>,
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        push: Option<Arc<dyn PushProvider>>,
        push_timeout: Duration,
    ) -> Self {
        let dispatcher = Arc::new(NotificationDispatcher::new(
            repos.clone(),
            push,
            push_timeout,
        ));

        Self {
            realtors: Arc::new(RealtorService::new(repos.clone())),
            connections: Arc::new(ConnectionService::new(repos.clone(), dispatcher.clone())),
            blocks: Arc::new(BlockService::new(repos.clone())),
            messages: Arc::new(MessageService::new(repos.clone(), dispatcher.clone())),
            jobs: Arc::new(JobService::new(repos.clone(), dispatcher.clone())),
            feedback: Arc::new(FeedbackService::new(repos.clone(), dispatcher.clone())),
            inbox: Arc::new(NotificationInbox::new(repos)),
            dispatcher,
        }
    }
}
