//! `custom_notification`: resolve the parties of an event, record one in-app
//! notification, then push to every device of the receiver.
//!
//! Dispatch never fails the caller. Every problem is logged, counted and
//! folded into a [`DispatchOutcome`].

use error_types::ServiceError;
use futures::future::join_all;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::push::PushProvider;
use crate::metrics;
use crate::models::{NewNotification, NotificationEvent, Realtor};
use crate::repository::Repositories;

pub const DEFAULT_PUSH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Delivered {
        notification_id: Uuid,
        pushes_attempted: usize,
        pushes_failed: usize,
    },
    /// A block exists between sender and receiver
    Suppressed,
    NoDeviceTokens,
    Failed {
        reason: String,
    },
}

impl DispatchOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::Delivered { .. } => "delivered",
            DispatchOutcome::Suppressed => "suppressed",
            DispatchOutcome::NoDeviceTokens => "no_device_tokens",
            DispatchOutcome::Failed { .. } => "failed",
        }
    }

    fn failed(reason: impl Into<String>) -> Self {
        DispatchOutcome::Failed {
            reason: reason.into(),
        }
    }
}

pub struct NotificationDispatcher {
    repos: Repositories,
    push: Option<Arc<dyn PushProvider>>,
    push_timeout: Duration,
}

impl NotificationDispatcher {
    pub fn new(
        repos: Repositories,
        push: Option<Arc<dyn PushProvider>>,
        push_timeout: Duration,
    ) -> Self {
        if push.is_none() {
            warn!("No push provider configured; notifications will be stored without push");
        }
        Self {
            repos,
            push,
            push_timeout,
        }
    }

    /// Run a dispatch off the request path.
    pub fn dispatch_detached(
        self: &Arc<Self>,
        sender_id: Uuid,
        receiver_id: Uuid,
        event: NotificationEvent,
    ) -> JoinHandle<DispatchOutcome> {
        let dispatcher = Arc::clone(self);
        tokio::spawn(async move {
            dispatcher
                .custom_notification(sender_id, receiver_id, event)
                .await
        })
    }

    /// `receiver_id` is a realtor id, except for [`NotificationEvent::AppliedJob`]
    /// where it is the job id and the job owner receives the notification.
    pub async fn custom_notification(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        event: NotificationEvent,
    ) -> DispatchOutcome {
        let outcome = self.dispatch(sender_id, receiver_id, event).await;
        metrics::record_dispatch(event, &outcome);

        match &outcome {
            DispatchOutcome::Delivered {
                notification_id,
                pushes_attempted,
                pushes_failed,
            } => info!(
                %sender_id,
                %receiver_id,
                event = %event,
                %notification_id,
                pushes_attempted,
                pushes_failed,
                "Notification delivered"
            ),
            DispatchOutcome::Failed { reason } => error!(
                %sender_id,
                %receiver_id,
                event = %event,
                reason = %reason,
                "Notification dispatch failed"
            ),
            other => debug!(
                %sender_id,
                %receiver_id,
                event = %event,
                outcome = other.label(),
                "Notification not delivered"
            ),
        }

        outcome
    }

    async fn dispatch(
        &self,
        sender_id: Uuid,
        receiver_id: Uuid,
        event: NotificationEvent,
    ) -> DispatchOutcome {
        let sender = match self.repos.realtors.get_realtor(sender_id).await {
            Ok(Some(sender)) => sender,
            Ok(None) => return DispatchOutcome::failed(format!("sender {sender_id} not found")),
            Err(e) => return DispatchOutcome::failed(format!("loading sender: {e}")),
        };

        let receiver = match self.resolve_receiver(receiver_id, event).await {
            Ok(receiver) => receiver,
            Err(outcome) => return outcome,
        };

        match self
            .repos
            .blocks
            .has_block_between(sender.id, receiver.id)
            .await
        {
            Ok(true) => return DispatchOutcome::Suppressed,
            Ok(false) => {}
            Err(e) => return DispatchOutcome::failed(format!("checking blocks: {e}")),
        }

        if receiver.firebase_device_tokens.is_empty() {
            info!(receiver_id = %receiver.id, event = %event, "Receiver has no device tokens");
            return DispatchOutcome::NoDeviceTokens;
        }

        let title = event.title();
        let body = event.body(&sender.display_name());

        // Stored before any push: the insert re-checks blocks, so a block that
        // lands after the check above stops the pushes as well.
        let stored = self
            .repos
            .notifications
            .create_notification(NewNotification {
                sender_id: sender.id,
                receiver_id: receiver.id,
                notification_type: event,
                title: title.to_string(),
                message: body.clone(),
            })
            .await;

        let notification = match stored {
            Ok(notification) => notification,
            Err(ServiceError::Forbidden(reason)) => {
                warn!(reason = %reason, "In-app notification rejected by block");
                return DispatchOutcome::Suppressed;
            }
            Err(e) => return DispatchOutcome::failed(format!("storing notification: {e}")),
        };

        let data = serde_json::json!({
            "notification_type": event.as_str(),
            "notification_id": notification.id.to_string(),
            "sender_id": sender.id.to_string(),
        });

        let (pushes_attempted, pushes_failed) =
            self.push_to_all(&receiver, title, &body, &data).await;

        DispatchOutcome::Delivered {
            notification_id: notification.id,
            pushes_attempted,
            pushes_failed,
        }
    }

    async fn resolve_receiver(
        &self,
        receiver_id: Uuid,
        event: NotificationEvent,
    ) -> Result<Realtor, DispatchOutcome> {
        if event.receiver_is_job() {
            return match self.repos.jobs.get_job_with_owner(receiver_id).await {
                Ok(Some(job)) => Ok(job.owner),
                Ok(None) => Err(DispatchOutcome::failed(format!(
                    "job {receiver_id} not found"
                ))),
                Err(e) => Err(DispatchOutcome::failed(format!("loading job: {e}"))),
            };
        }

        match self.repos.realtors.get_realtor(receiver_id).await {
            Ok(Some(receiver)) => Ok(receiver),
            Ok(None) => Err(DispatchOutcome::failed(format!(
                "receiver {receiver_id} not found"
            ))),
            Err(e) => Err(DispatchOutcome::failed(format!("loading receiver: {e}"))),
        }
    }

    /// One attempt per token of `receiver`, all in flight at once.
    /// Returns (attempted, failed).
    async fn push_to_all(
        &self,
        receiver: &Realtor,
        title: &str,
        body: &str,
        data: &serde_json::Value,
    ) -> (usize, usize) {
        let tokens = &receiver.firebase_device_tokens;
        let Some(push) = &self.push else {
            warn!(tokens = tokens.len(), "Push provider not configured, skipping push");
            return (0, 0);
        };

        let sends = tokens.iter().map(|token| {
            let push = Arc::clone(push);
            async move {
                let sent = tokio::time::timeout(
                    self.push_timeout,
                    push.send(token, title, body, Some(data.clone())),
                )
                .await;

                let ok = match sent {
                    Ok(Ok(message_id)) => {
                        debug!(?message_id, "Push sent");
                        true
                    }
                    Ok(Err(e)) => {
                        warn!(error = %e, "Push failed");
                        if e.is_unregistered_token() {
                            self.prune_token(receiver.id, token).await;
                        }
                        false
                    }
                    Err(_) => {
                        warn!(timeout_secs = self.push_timeout.as_secs(), "Push timed out");
                        false
                    }
                };
                metrics::record_push(ok);
                ok
            }
        });

        let results = join_all(sends).await;
        let failed = results.iter().filter(|ok| !**ok).count();
        (results.len(), failed)
    }

    /// Drop a token the push provider no longer recognises.
    async fn prune_token(&self, receiver_id: Uuid, token: &str) {
        match self
            .repos
            .realtors
            .remove_device_token(receiver_id, token)
            .await
        {
            Ok(true) => info!(%receiver_id, "Removed unregistered device token"),
            Ok(false) => {}
            Err(e) => warn!(
                %receiver_id,
                error = %e,
                "Failed to remove unregistered device token"
            ),
        }
    }
}
