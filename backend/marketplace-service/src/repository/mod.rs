mod postgres;
mod r#trait;

pub use postgres::PostgresRepository;
pub use r#trait::{
    BlockRepository, ConnectionRepository, FeedbackRepository, JobRepository, MessageRepository,
    NotificationRepository, RealtorRepository,
};

use std::sync::Arc;

/// Handles to every repository, shared by the services.
#[derive(Clone)]
pub struct Repositories {
    pub realtors: Arc<dyn RealtorRepository>,
    pub connections: Arc<dyn ConnectionRepository>,
    pub blocks: Arc<dyn BlockRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub jobs: Arc<dyn JobRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
}

impl Repositories {
    /// Use one store for every aggregate.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: RealtorRepository
            + ConnectionRepository
            + BlockRepository
            + NotificationRepository
            + MessageRepository
            + JobRepository
            + FeedbackRepository
            + 'static,
    {
        Self {
            realtors: store.clone(),
            connections: store.clone(),
            blocks: store.clone(),
            notifications: store.clone(),
            messages: store.clone(),
            jobs: store.clone(),
            feedback: store,
        }
    }
}
