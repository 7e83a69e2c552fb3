//! Connection lifecycle against the in-memory store: requests, acceptance,
//! revocation, deletion and the effect of blocks.

mod common;

use common::TestContext;
use error_types::{error_codes, ServiceError};
use marketplace_service::models::{
    ConnectionFilter, ConnectionUpdate, MessageType, NotificationEvent,
};

#[tokio::test]
async fn test_request_accept_delete_keeps_friends_in_sync() {
    let ctx = TestContext::new();
    let alice = ctx.realtor_with_devices("Alice", 1).await;
    let bob = ctx.realtor_with_devices("Bob", 1).await;

    let connection = ctx
        .state
        .connections
        .create_request(alice.id, bob.id)
        .await
        .unwrap();
    assert!(!connection.connected);
    assert!(ctx.friends_of(alice.id).is_empty());
    assert!(ctx.friends_of(bob.id).is_empty());

    let requested = ctx.wait_for_notifications(bob.id, 1).await;
    assert_eq!(requested.len(), 1);
    assert_eq!(
        requested[0].notification_type,
        NotificationEvent::ConnectionRequest
    );
    assert_eq!(requested[0].sender_id, alice.id);

    let accepted = ctx
        .state
        .connections
        .update_request(alice.id, bob.id, ConnectionUpdate { connected: true })
        .await
        .unwrap();
    assert!(accepted.connected);
    assert_eq!(ctx.friends_of(alice.id), vec![bob.id]);
    assert_eq!(ctx.friends_of(bob.id), vec![alice.id]);

    let to_alice = ctx.wait_for_notifications(alice.id, 1).await;
    assert_eq!(to_alice.len(), 1);
    assert_eq!(
        to_alice[0].notification_type,
        NotificationEvent::ConnectionAccepted
    );
    assert_eq!(to_alice[0].sender_id, bob.id);

    ctx.state
        .connections
        .delete_request(connection.id)
        .await
        .unwrap();
    assert!(ctx.friends_of(alice.id).is_empty());
    assert!(ctx.friends_of(bob.id).is_empty());
    assert_eq!(ctx.store.connection_count(), 0);
}

#[tokio::test]
async fn test_duplicate_request_conflicts_in_either_direction() {
    let ctx = TestContext::new();
    let alice = ctx.realtor("Alice").await;
    let bob = ctx.realtor("Bob").await;

    ctx.state
        .connections
        .create_request(alice.id, bob.id)
        .await
        .unwrap();

    for (from, to) in [(alice.id, bob.id), (bob.id, alice.id)] {
        let err = ctx
            .state
            .connections
            .create_request(from, to)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Conflict { code, .. } if code == error_codes::CONNECTION_EXISTS
        ));
    }
    assert_eq!(ctx.store.connection_count(), 1);
}

#[tokio::test]
async fn test_request_to_self_is_rejected() {
    let ctx = TestContext::new();
    let alice = ctx.realtor("Alice").await;

    let err = ctx
        .state
        .connections
        .create_request(alice.id, alice.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(_)));
}

#[tokio::test]
async fn test_request_to_unknown_realtor_is_not_found() {
    let ctx = TestContext::new();
    let alice = ctx.realtor("Alice").await;

    let err = ctx
        .state
        .connections
        .create_request(alice.id, uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_accepting_twice_does_not_duplicate_friends_or_notify_again() {
    let ctx = TestContext::new();
    let alice = ctx.realtor_with_devices("Alice", 1).await;
    let bob = ctx.realtor("Bob").await;

    ctx.state
        .connections
        .create_request(alice.id, bob.id)
        .await
        .unwrap();
    for _ in 0..2 {
        ctx.state
            .connections
            .update_request(alice.id, bob.id, ConnectionUpdate { connected: true })
            .await
            .unwrap();
    }

    assert_eq!(ctx.friends_of(alice.id), vec![bob.id]);
    assert_eq!(ctx.friends_of(bob.id), vec![alice.id]);

    ctx.wait_for_notifications(alice.id, 1).await;
    ctx.settle().await;
    assert_eq!(ctx.store.notifications_for(alice.id).len(), 1);
}

#[tokio::test]
async fn test_update_accepts_reversed_pair() {
    let ctx = TestContext::new();
    let alice = ctx.realtor_with_devices("Alice", 1).await;
    let bob = ctx.realtor_with_devices("Bob", 1).await;

    ctx.state
        .connections
        .create_request(alice.id, bob.id)
        .await
        .unwrap();
    let accepted = ctx
        .state
        .connections
        .update_request(bob.id, alice.id, ConnectionUpdate { connected: true })
        .await
        .unwrap();

    assert!(accepted.connected);
    assert_eq!(ctx.friends_of(alice.id), vec![bob.id]);

    // Alice asked, so she hears about the acceptance and Bob does not
    let to_alice = ctx.wait_for_notifications(alice.id, 1).await;
    ctx.settle().await;
    let accepted_for = |id| {
        ctx.store
            .notifications_for(id)
            .into_iter()
            .filter(|n| n.notification_type == NotificationEvent::ConnectionAccepted)
            .collect::<Vec<_>>()
    };
    assert_eq!(to_alice.len(), 1);
    assert_eq!(accepted_for(alice.id).len(), 1);
    assert_eq!(accepted_for(alice.id)[0].sender_id, bob.id);
    assert_eq!(
        accepted_for(alice.id)[0].message,
        "Bob Tester accepted your connection request"
    );
    assert!(accepted_for(bob.id).is_empty());
}

#[tokio::test]
async fn test_revoking_removes_friends_but_keeps_connection() {
    let ctx = TestContext::new();
    let alice = ctx.realtor("Alice").await;
    let bob = ctx.realtor("Bob").await;

    let connection = ctx
        .state
        .connections
        .create_request(alice.id, bob.id)
        .await
        .unwrap();
    ctx.state
        .connections
        .update_request(alice.id, bob.id, ConnectionUpdate { connected: true })
        .await
        .unwrap();
    let revoked = ctx
        .state
        .connections
        .update_request(alice.id, bob.id, ConnectionUpdate { connected: false })
        .await
        .unwrap();

    assert!(!revoked.connected);
    assert!(ctx.friends_of(alice.id).is_empty());
    assert!(ctx.friends_of(bob.id).is_empty());
    assert!(ctx.store.connection(connection.id).is_some());
}

#[tokio::test]
async fn test_update_without_request_is_not_found() {
    let ctx = TestContext::new();
    let alice = ctx.realtor("Alice").await;
    let bob = ctx.realtor("Bob").await;

    let err = ctx
        .state
        .connections
        .update_request(alice.id, bob.id, ConnectionUpdate { connected: true })
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_unknown_connection_is_not_found() {
    let ctx = TestContext::new();
    let err = ctx
        .state
        .connections
        .delete_request(uuid::Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_removes_connection_messages() {
    let ctx = TestContext::new();
    let alice = ctx.realtor("Alice").await;
    let bob = ctx.realtor("Bob").await;

    let connection = ctx
        .state
        .connections
        .create_request(alice.id, bob.id)
        .await
        .unwrap();
    ctx.state
        .connections
        .update_request(alice.id, bob.id, ConnectionUpdate { connected: true })
        .await
        .unwrap();
    ctx.state
        .messages
        .send_message(alice.id, connection.id, "hello bob", MessageType::Text)
        .await
        .unwrap();
    assert_eq!(ctx.store.message_count(connection.id), 1);

    ctx.state
        .connections
        .delete_request(connection.id)
        .await
        .unwrap();
    assert_eq!(ctx.store.message_count(connection.id), 0);
}

#[tokio::test]
async fn test_get_all_filters_by_realtor_and_state() {
    let ctx = TestContext::new();
    let alice = ctx.realtor("Alice").await;
    let bob = ctx.realtor("Bob").await;
    let carol = ctx.realtor("Carol").await;

    ctx.state
        .connections
        .create_request(alice.id, bob.id)
        .await
        .unwrap();
    ctx.state
        .connections
        .create_request(carol.id, alice.id)
        .await
        .unwrap();
    ctx.state
        .connections
        .update_request(carol.id, alice.id, ConnectionUpdate { connected: true })
        .await
        .unwrap();

    let all_for_alice = ctx
        .state
        .connections
        .get_all(&ConnectionFilter {
            realtor_id: Some(alice.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(all_for_alice.len(), 2);

    let accepted = ctx
        .state
        .connections
        .get_all(&ConnectionFilter {
            realtor_id: Some(alice.id),
            connected: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].from_realtor.id, carol.id);
    assert_eq!(accepted[0].to_realtor.id, alice.id);

    let for_bob = ctx
        .state
        .connections
        .get_all(&ConnectionFilter {
            realtor_id: Some(bob.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(for_bob.len(), 1);
}

#[tokio::test]
async fn test_get_by_id_embeds_both_realtors() {
    let ctx = TestContext::new();
    let alice = ctx.realtor("Alice").await;
    let bob = ctx.realtor("Bob").await;

    let connection = ctx
        .state
        .connections
        .create_request(alice.id, bob.id)
        .await
        .unwrap();
    let detail = ctx.state.connections.get_by_id(connection.id).await.unwrap();

    assert_eq!(detail.connection.id, connection.id);
    assert_eq!(detail.from_realtor.first_name, "Alice");
    assert_eq!(detail.to_realtor.first_name, "Bob");
}

#[tokio::test]
async fn test_block_drops_connection_and_friends() {
    let ctx = TestContext::new();
    let alice = ctx.realtor("Alice").await;
    let bob = ctx.realtor("Bob").await;

    ctx.state
        .connections
        .create_request(alice.id, bob.id)
        .await
        .unwrap();
    ctx.state
        .connections
        .update_request(alice.id, bob.id, ConnectionUpdate { connected: true })
        .await
        .unwrap();

    ctx.state.blocks.block(bob.id, alice.id).await.unwrap();

    assert_eq!(ctx.store.connection_count(), 0);
    assert!(ctx.friends_of(alice.id).is_empty());
    assert!(ctx.friends_of(bob.id).is_empty());

    // Neither side can reconnect while the block stands
    for (from, to) in [(alice.id, bob.id), (bob.id, alice.id)] {
        let err = ctx
            .state
            .connections
            .create_request(from, to)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    ctx.state.blocks.unblock(bob.id, alice.id).await.unwrap();
    ctx.state
        .connections
        .create_request(alice.id, bob.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_block_twice_conflicts_and_self_block_rejected() {
    let ctx = TestContext::new();
    let alice = ctx.realtor("Alice").await;
    let bob = ctx.realtor("Bob").await;

    ctx.state.blocks.block(alice.id, bob.id).await.unwrap();
    let err = ctx.state.blocks.block(alice.id, bob.id).await.unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Conflict { code, .. } if code == error_codes::ALREADY_BLOCKED
    ));

    let err = ctx.state.blocks.block(alice.id, alice.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::BadRequest(_)));

    let err = ctx.state.blocks.unblock(bob.id, alice.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn test_relationship_status_reports_each_side() {
    let ctx = TestContext::new();
    let alice = ctx.realtor("Alice").await;
    let bob = ctx.realtor("Bob").await;

    ctx.state
        .connections
        .create_request(alice.id, bob.id)
        .await
        .unwrap();
    let pending = ctx
        .state
        .blocks
        .relationship_status(alice.id, bob.id)
        .await
        .unwrap();
    assert!(pending.pending);
    assert!(!pending.connected);

    ctx.state.blocks.block(alice.id, bob.id).await.unwrap();
    let from_alice = ctx
        .state
        .blocks
        .relationship_status(alice.id, bob.id)
        .await
        .unwrap();
    assert!(from_alice.is_blocking);
    assert!(!from_alice.is_blocked);
    assert!(!from_alice.pending);

    let from_bob = ctx
        .state
        .blocks
        .relationship_status(bob.id, alice.id)
        .await
        .unwrap();
    assert!(from_bob.is_blocked);
    assert!(!from_bob.is_blocking);
}

#[tokio::test]
async fn test_messages_require_accepted_connection() {
    let ctx = TestContext::new();
    let alice = ctx.realtor("Alice").await;
    let bob = ctx.realtor_with_devices("Bob", 1).await;
    let carol = ctx.realtor("Carol").await;

    let connection = ctx
        .state
        .connections
        .create_request(alice.id, bob.id)
        .await
        .unwrap();

    let err = ctx
        .state
        .messages
        .send_message(alice.id, connection.id, "too early", MessageType::Text)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    ctx.state
        .connections
        .update_request(alice.id, bob.id, ConnectionUpdate { connected: true })
        .await
        .unwrap();

    let err = ctx
        .state
        .messages
        .send_message(carol.id, connection.id, "not mine", MessageType::Text)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));

    let err = ctx
        .state
        .messages
        .send_message(alice.id, connection.id, "   ", MessageType::Text)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::ValidationError(_)));

    let sent = ctx
        .state
        .messages
        .send_message(alice.id, connection.id, "hi bob", MessageType::Text)
        .await
        .unwrap();
    assert_eq!(sent.receiver_id, bob.id);

    // ConnectionRequest then Message
    let to_bob = ctx.wait_for_notifications(bob.id, 2).await;
    assert!(to_bob
        .iter()
        .any(|n| n.notification_type == NotificationEvent::Message));

    let read = ctx.state.messages.mark_read(sent.id).await.unwrap();
    assert_eq!(read.status.as_str(), "read");
}
