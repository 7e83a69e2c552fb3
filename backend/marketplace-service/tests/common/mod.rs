//! Shared fixtures for marketplace-service integration tests.
#![allow(dead_code)]

pub mod memory_store;
pub mod recording_push;

pub use memory_store::InMemoryStore;
pub use recording_push::RecordingPushProvider;

use marketplace_service::models::{NewRealtor, Notification, Realtor};
use marketplace_service::services::PushProvider;
use marketplace_service::{AppState, Repositories};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub push: RecordingPushProvider,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        let push = RecordingPushProvider::new();
        Self::build(Some(Arc::new(push.clone())), push)
    }

    /// Dispatcher runs with no push provider configured.
    pub fn without_push() -> Self {
        Self::build(None, RecordingPushProvider::new())
    }

    fn build(provider: Option<Arc<dyn PushProvider>>, push: RecordingPushProvider) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let repos = Repositories::from_store(store.clone());
        let state = AppState::new(repos, provider, Duration::from_secs(2));
        Self { store, push, state }
    }

    pub async fn realtor(&self, first_name: &str) -> Realtor {
        self.state
            .realtors
            .create_realtor(NewRealtor {
                first_name: first_name.to_string(),
                last_name: "Tester".to_string(),
                email: format!("{}-{}@example.com", first_name.to_lowercase(), Uuid::new_v4()),
                profile_image: None,
            })
            .await
            .expect("create realtor")
    }

    /// Realtor with device tokens `<name>-device-<n>`.
    pub async fn realtor_with_devices(&self, first_name: &str, devices: usize) -> Realtor {
        let realtor = self.realtor(first_name).await;
        for n in 0..devices {
            self.state
                .realtors
                .register_device_token(realtor.id, &device_token(first_name, n))
                .await
                .expect("register device token");
        }
        self.store.realtor(realtor.id).expect("realtor exists")
    }

    pub fn friends_of(&self, id: Uuid) -> Vec<Uuid> {
        self.store.realtor(id).map(|r| r.friends).unwrap_or_default()
    }

    /// Detached dispatches land asynchronously; poll until `count` rows exist.
    pub async fn wait_for_notifications(&self, receiver_id: Uuid, count: usize) -> Vec<Notification> {
        for _ in 0..100 {
            let notifications = self.store.notifications_for(receiver_id);
            if notifications.len() >= count {
                return notifications;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        self.store.notifications_for(receiver_id)
    }

    /// Give detached dispatches time to finish when asserting that nothing happens.
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

pub fn device_token(name: &str, n: usize) -> String {
    format!("{}-device-token-{n}", name.to_lowercase())
}
