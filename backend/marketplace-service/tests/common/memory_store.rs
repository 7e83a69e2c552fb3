//! In-memory store for integration tests
//!
//! Implements every repository trait over one mutex-guarded state, so
//! multi-row changes are atomic the same way the Postgres transactions are.

use async_trait::async_trait;
use chrono::Utc;
use error_types::{error_codes, ServiceError, ServiceResult};
use marketplace_service::models::*;
use marketplace_service::repository::{
    BlockRepository, ConnectionRepository, FeedbackRepository, JobRepository, MessageRepository,
    NotificationRepository, RealtorRepository,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

#[derive(Default)]
struct State {
    realtors: HashMap<Uuid, Realtor>,
    connections: HashMap<Uuid, Connection>,
    blocks: Vec<Block>,
    notifications: Vec<Notification>,
    messages: Vec<Message>,
    jobs: HashMap<Uuid, Job>,
    feedback: Vec<Feedback>,
}

impl State {
    fn find_between(&self, a: Uuid, b: Uuid) -> Option<Connection> {
        self.connections
            .values()
            .find(|c| c.is_between(a, b))
            .cloned()
    }

    fn has_block_between(&self, a: Uuid, b: Uuid) -> bool {
        self.blocks.iter().any(|block| {
            (block.from_realtor == a && block.to_realtor == b)
                || (block.from_realtor == b && block.to_realtor == a)
        })
    }

    fn add_friend(&mut self, realtor_id: Uuid, friend_id: Uuid) {
        if let Some(realtor) = self.realtors.get_mut(&realtor_id) {
            if !realtor.friends.contains(&friend_id) {
                realtor.friends.push(friend_id);
                realtor.updated_at = Utc::now();
            }
        }
    }

    fn remove_friend(&mut self, realtor_id: Uuid, friend_id: Uuid) {
        if let Some(realtor) = self.realtors.get_mut(&realtor_id) {
            realtor.friends.retain(|id| *id != friend_id);
            realtor.updated_at = Utc::now();
        }
    }

    fn remove_connection(&mut self, connection: &Connection) {
        self.remove_friend(connection.from_id, connection.to_id);
        self.remove_friend(connection.to_id, connection.from_id);
        self.messages.retain(|m| m.connection_id != connection.id);
        self.connections.remove(&connection.id);
    }

    fn with_realtors(&self, connection: &Connection) -> Option<ConnectionWithRealtors> {
        Some(ConnectionWithRealtors {
            connection: connection.clone(),
            from_realtor: self.realtors.get(&connection.from_id)?.summary(),
            to_realtor: self.realtors.get(&connection.to_id)?.summary(),
        })
    }
}

fn paginate<T: Clone>(items: Vec<T>, page: Pagination) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect()
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<Mutex<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn realtor(&self, id: Uuid) -> Option<Realtor> {
        self.state.lock().unwrap().realtors.get(&id).cloned()
    }

    pub fn connection_count(&self) -> usize {
        self.state.lock().unwrap().connections.len()
    }

    pub fn connection(&self, id: Uuid) -> Option<Connection> {
        self.state.lock().unwrap().connections.get(&id).cloned()
    }

    pub fn notifications_for(&self, receiver_id: Uuid) -> Vec<Notification> {
        self.state
            .lock()
            .unwrap()
            .notifications
            .iter()
            .filter(|n| n.receiver_id == receiver_id)
            .cloned()
            .collect()
    }

    pub fn notification_count(&self) -> usize {
        self.state.lock().unwrap().notifications.len()
    }

    pub fn message_count(&self, connection_id: Uuid) -> usize {
        self.state
            .lock()
            .unwrap()
            .messages
            .iter()
            .filter(|m| m.connection_id == connection_id)
            .count()
    }

    /// Bypasses the service rules, to set up states the API would refuse.
    pub fn insert_block_raw(&self, from: Uuid, to: Uuid) {
        self.state.lock().unwrap().blocks.push(Block {
            id: Uuid::new_v4(),
            from_realtor: from,
            to_realtor: to,
            created_at: Utc::now(),
        });
    }
}

#[async_trait]
impl RealtorRepository for InMemoryStore {
    async fn create_realtor(&self, realtor: NewRealtor) -> ServiceResult<Realtor> {
        let mut state = self.state.lock().unwrap();
        if state
            .realtors
            .values()
            .any(|r| r.email.eq_ignore_ascii_case(&realtor.email))
        {
            return Err(ServiceError::conflict(
                error_codes::REALTOR_EMAIL_EXISTS,
                format!("a realtor with email {} already exists", realtor.email),
            ));
        }

        let now = Utc::now();
        let created = Realtor {
            id: Uuid::new_v4(),
            first_name: realtor.first_name,
            last_name: realtor.last_name,
            email: realtor.email,
            profile_image: realtor.profile_image,
            friends: Vec::new(),
            firebase_device_tokens: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        state.realtors.insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_realtor(&self, id: Uuid) -> ServiceResult<Option<Realtor>> {
        Ok(self.realtor(id))
    }

    async fn add_device_token(
        &self,
        realtor_id: Uuid,
        token: &str,
    ) -> ServiceResult<Option<Vec<String>>> {
        let mut state = self.state.lock().unwrap();
        Ok(state.realtors.get_mut(&realtor_id).map(|realtor| {
            if !realtor.firebase_device_tokens.iter().any(|t| t == token) {
                realtor.firebase_device_tokens.push(token.to_string());
            }
            realtor.firebase_device_tokens.clone()
        }))
    }

    async fn remove_device_token(&self, realtor_id: Uuid, token: &str) -> ServiceResult<bool> {
        let mut state = self.state.lock().unwrap();
        let Some(realtor) = state.realtors.get_mut(&realtor_id) else {
            return Ok(false);
        };
        let before = realtor.firebase_device_tokens.len();
        realtor.firebase_device_tokens.retain(|t| t != token);
        Ok(realtor.firebase_device_tokens.len() < before)
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryStore {
    async fn get_connection(&self, id: Uuid) -> ServiceResult<Option<Connection>> {
        Ok(self.connection(id))
    }

    async fn find_between(&self, a: Uuid, b: Uuid) -> ServiceResult<Option<Connection>> {
        Ok(self.state.lock().unwrap().find_between(a, b))
    }

    async fn get_connection_with_realtors(
        &self,
        id: Uuid,
    ) -> ServiceResult<Option<ConnectionWithRealtors>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .connections
            .get(&id)
            .and_then(|c| state.with_realtors(c)))
    }

    async fn list_connections(
        &self,
        filter: &ConnectionFilter,
    ) -> ServiceResult<Vec<ConnectionWithRealtors>> {
        let state = self.state.lock().unwrap();
        let mut matching: Vec<_> = state
            .connections
            .values()
            .filter(|c| filter.matches(c))
            .filter_map(|c| state.with_realtors(c))
            .collect();
        matching.sort_by(|a, b| b.connection.created_at.cmp(&a.connection.created_at));
        Ok(paginate(matching, filter.page()))
    }

    async fn insert_request(
        &self,
        from_id: Uuid,
        to_id: Uuid,
    ) -> ServiceResult<Option<Connection>> {
        let mut state = self.state.lock().unwrap();
        if state.find_between(from_id, to_id).is_some() {
            return Ok(None);
        }

        let now = Utc::now();
        let connection = Connection {
            id: Uuid::new_v4(),
            from_id,
            to_id,
            connected: false,
            created_at: now,
            updated_at: now,
        };
        state.connections.insert(connection.id, connection.clone());
        Ok(Some(connection))
    }

    async fn set_connected(
        &self,
        id: Uuid,
        connected: bool,
    ) -> ServiceResult<Option<Connection>> {
        let mut state = self.state.lock().unwrap();
        let Some(connection) = state.connections.get_mut(&id) else {
            return Ok(None);
        };
        connection.connected = connected;
        connection.updated_at = Utc::now();
        let connection = connection.clone();

        if connected {
            state.add_friend(connection.from_id, connection.to_id);
            state.add_friend(connection.to_id, connection.from_id);
        } else {
            state.remove_friend(connection.from_id, connection.to_id);
            state.remove_friend(connection.to_id, connection.from_id);
        }
        Ok(Some(connection))
    }

    async fn delete_connection(&self, id: Uuid) -> ServiceResult<Option<Connection>> {
        let mut state = self.state.lock().unwrap();
        let Some(connection) = state.connections.get(&id).cloned() else {
            return Ok(None);
        };
        state.remove_connection(&connection);
        Ok(Some(connection))
    }
}

#[async_trait]
impl BlockRepository for InMemoryStore {
    async fn create_block(&self, from: Uuid, to: Uuid) -> ServiceResult<Option<Block>> {
        let mut state = self.state.lock().unwrap();
        if state
            .blocks
            .iter()
            .any(|b| b.from_realtor == from && b.to_realtor == to)
        {
            return Ok(None);
        }

        let block = Block {
            id: Uuid::new_v4(),
            from_realtor: from,
            to_realtor: to,
            created_at: Utc::now(),
        };
        state.blocks.push(block.clone());
        if let Some(connection) = state.find_between(from, to) {
            state.remove_connection(&connection);
        }
        Ok(Some(block))
    }

    async fn delete_block(&self, from: Uuid, to: Uuid) -> ServiceResult<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.blocks.len();
        state
            .blocks
            .retain(|b| !(b.from_realtor == from && b.to_realtor == to));
        Ok(state.blocks.len() < before)
    }

    async fn is_blocked(&self, blocker: Uuid, blocked: Uuid) -> ServiceResult<bool> {
        Ok(self
            .state
            .lock()
            .unwrap()
            .blocks
            .iter()
            .any(|b| b.from_realtor == blocker && b.to_realtor == blocked))
    }

    async fn list_blocked(&self, from: Uuid, page: Pagination) -> ServiceResult<Vec<Block>> {
        let state = self.state.lock().unwrap();
        let mut blocks: Vec<_> = state
            .blocks
            .iter()
            .filter(|b| b.from_realtor == from)
            .cloned()
            .collect();
        blocks.reverse();
        Ok(paginate(blocks, page))
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn create_notification(
        &self,
        notification: NewNotification,
    ) -> ServiceResult<Notification> {
        let mut state = self.state.lock().unwrap();
        if state.has_block_between(notification.sender_id, notification.receiver_id) {
            return Err(ServiceError::Forbidden(
                "notification blocked between sender and receiver".to_string(),
            ));
        }

        let created = Notification {
            id: Uuid::new_v4(),
            sender_id: notification.sender_id,
            receiver_id: notification.receiver_id,
            notification_type: notification.notification_type,
            title: notification.title,
            message: notification.message,
            is_read: false,
            created_at: Utc::now(),
        };
        state.notifications.push(created.clone());
        Ok(created)
    }

    async fn list_notifications(
        &self,
        receiver_id: Uuid,
        page: Pagination,
    ) -> ServiceResult<Vec<Notification>> {
        let mut notifications = self.notifications_for(receiver_id);
        notifications.reverse();
        Ok(paginate(notifications, page))
    }

    async fn mark_notification_read(&self, id: Uuid, receiver_id: Uuid) -> ServiceResult<bool> {
        let mut state = self.state.lock().unwrap();
        match state
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.receiver_id == receiver_id)
        {
            Some(notification) => {
                notification.is_read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_notification(&self, id: Uuid, receiver_id: Uuid) -> ServiceResult<bool> {
        let mut state = self.state.lock().unwrap();
        let before = state.notifications.len();
        state
            .notifications
            .retain(|n| !(n.id == id && n.receiver_id == receiver_id));
        Ok(state.notifications.len() < before)
    }
}

#[async_trait]
impl MessageRepository for InMemoryStore {
    async fn insert_message(&self, message: NewMessage) -> ServiceResult<Message> {
        let created = Message {
            id: Uuid::new_v4(),
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            connection_id: message.connection_id,
            message: message.message,
            message_type: message.message_type,
            status: MessageStatus::Sent,
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().messages.push(created.clone());
        Ok(created)
    }

    async fn list_messages(
        &self,
        connection_id: Uuid,
        page: Pagination,
    ) -> ServiceResult<Vec<Message>> {
        let state = self.state.lock().unwrap();
        let messages: Vec<_> = state
            .messages
            .iter()
            .filter(|m| m.connection_id == connection_id)
            .cloned()
            .collect();
        Ok(paginate(messages, page))
    }

    async fn mark_message_read(&self, id: Uuid) -> ServiceResult<Option<Message>> {
        let mut state = self.state.lock().unwrap();
        Ok(state.messages.iter_mut().find(|m| m.id == id).map(|m| {
            m.status = MessageStatus::Read;
            m.clone()
        }))
    }

    async fn delete_messages_for_connection(&self, connection_id: Uuid) -> ServiceResult<u64> {
        let mut state = self.state.lock().unwrap();
        let before = state.messages.len();
        state.messages.retain(|m| m.connection_id != connection_id);
        Ok((before - state.messages.len()) as u64)
    }
}

#[async_trait]
impl JobRepository for InMemoryStore {
    async fn create_job(&self, job: NewJob) -> ServiceResult<Job> {
        let now = Utc::now();
        let created = Job {
            id: Uuid::new_v4(),
            owner_id: job.owner_id,
            title: job.title,
            description: job.description,
            location: job.location,
            price: job.price,
            applicants: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.state
            .lock()
            .unwrap()
            .jobs
            .insert(created.id, created.clone());
        Ok(created)
    }

    async fn get_job(&self, id: Uuid) -> ServiceResult<Option<Job>> {
        Ok(self.state.lock().unwrap().jobs.get(&id).cloned())
    }

    async fn get_job_with_owner(&self, id: Uuid) -> ServiceResult<Option<JobWithOwner>> {
        let state = self.state.lock().unwrap();
        Ok(state.jobs.get(&id).and_then(|job| {
            state.realtors.get(&job.owner_id).map(|owner| JobWithOwner {
                job: job.clone(),
                owner: owner.clone(),
            })
        }))
    }

    async fn list_jobs(&self, page: Pagination) -> ServiceResult<Vec<Job>> {
        let state = self.state.lock().unwrap();
        let mut jobs: Vec<_> = state.jobs.values().cloned().collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(jobs, page))
    }

    async fn add_applicant(&self, job_id: Uuid, applicant_id: Uuid) -> ServiceResult<bool> {
        let mut state = self.state.lock().unwrap();
        match state.jobs.get_mut(&job_id) {
            Some(job) if !job.applicants.contains(&applicant_id) => {
                job.applicants.push(applicant_id);
                job.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryStore {
    async fn create_feedback(&self, feedback: NewFeedback) -> ServiceResult<Feedback> {
        let created = Feedback {
            id: Uuid::new_v4(),
            from_realtor: feedback.from_realtor,
            to_realtor: feedback.to_realtor,
            job_id: feedback.job_id,
            rating: feedback.rating,
            comment: feedback.comment,
            created_at: Utc::now(),
        };
        self.state.lock().unwrap().feedback.push(created.clone());
        Ok(created)
    }

    async fn list_feedback(
        &self,
        to_realtor: Uuid,
        page: Pagination,
    ) -> ServiceResult<Vec<Feedback>> {
        let state = self.state.lock().unwrap();
        let mut feedback: Vec<_> = state
            .feedback
            .iter()
            .filter(|f| f.to_realtor == to_realtor)
            .cloned()
            .collect();
        feedback.reverse();
        Ok(paginate(feedback, page))
    }
}
