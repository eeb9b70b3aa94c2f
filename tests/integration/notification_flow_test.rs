//! Integration tests for the notification list flows.

use triphub_core::types::filter::NotificationFilter;
use triphub_core::types::id::NotificationId;
use triphub_entity::{ActionTaken, NotificationKind};
use triphub_realtime::message::types::ServerEvent;
use triphub_realtime::UiEvent;

use crate::helpers::{notification, TestApp};

#[tokio::test]
async fn test_push_merges_with_fetched_list_without_duplicates() {
    let mut app = TestApp::new();
    app.connect().await;

    app.backend.seed_notifications(vec![
        notification("n1", NotificationKind::Generic, 30),
        notification("n2", NotificationKind::CommunityTripJoinRequest, 10),
    ]);
    app.notifications.refresh().await.unwrap();
    assert_eq!(app.notifications.unread_count(), 2);

    // A fresh push lands at the top; a replayed one is dropped.
    app.handle
        .push(ServerEvent::AdminNotification(notification(
            "n3",
            NotificationKind::Generic,
            0,
        )))
        .await;
    app.pump().await;
    app.handle
        .push(ServerEvent::AdminNotification(notification(
            "n2",
            NotificationKind::CommunityTripJoinRequest,
            10,
        )))
        .await;
    app.pump().await;

    let items = app.notifications.filtered(NotificationFilter::All);
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].id, NotificationId::new("n3"));
    assert_eq!(app.notifications.unread_count(), 3);
}

#[tokio::test]
async fn test_approval_routes_by_notification_kind() {
    let app = TestApp::new();
    app.backend.seed_notifications(vec![
        notification("join", NotificationKind::CommunityTripJoinRequest, 5),
        notification("create", NotificationKind::CommunityTripCreationRequest, 3),
    ]);
    app.notifications.refresh().await.unwrap();

    app.notifications
        .approve(&NotificationId::new("join"))
        .await
        .unwrap();
    app.notifications
        .reject(&NotificationId::new("create"))
        .await
        .unwrap();

    let calls = app.backend.calls();
    assert!(calls.contains(&"approve-notification:join".to_string()));
    assert!(calls.contains(&"reject-trip:trip-1".to_string()));

    let join = app.notifications.get(&NotificationId::new("join")).unwrap();
    assert_eq!(join.action_taken, ActionTaken::Approved);
    assert!(join.is_read);
}

#[tokio::test]
async fn test_resolved_notification_ignores_further_decisions() {
    let app = TestApp::new();
    app.backend.seed_notifications(vec![notification(
        "n1",
        NotificationKind::CommunityTripJoinRequest,
        5,
    )]);
    app.notifications.refresh().await.unwrap();

    app.notifications
        .approve(&NotificationId::new("n1"))
        .await
        .unwrap();
    let calls_after_first = app.backend.calls().len();

    // The decision is terminal: the opposite action is a no-op with no
    // backend round trip.
    app.notifications
        .reject(&NotificationId::new("n1"))
        .await
        .unwrap();
    assert_eq!(app.backend.calls().len(), calls_after_first);
    assert_eq!(
        app.notifications
            .get(&NotificationId::new("n1"))
            .unwrap()
            .action_taken,
        ActionTaken::Approved
    );
}

#[tokio::test]
async fn test_mark_all_read_recomputes_and_skips_when_clean() {
    let app = TestApp::new();
    app.backend.seed_notifications(vec![
        notification("n1", NotificationKind::Generic, 5),
        notification("n2", NotificationKind::Generic, 3),
    ]);
    app.notifications.refresh().await.unwrap();

    app.notifications.mark_all_read().await.unwrap();
    assert_eq!(app.notifications.unread_count(), 0);
    let calls_after_first = app.backend.calls().len();

    // Nothing unread: no second round trip.
    app.notifications.mark_all_read().await.unwrap();
    assert_eq!(app.backend.calls().len(), calls_after_first);
}

#[tokio::test]
async fn test_remote_resolution_event_mirrors_locally() {
    let mut app = TestApp::new();
    app.connect().await;
    app.backend.seed_notifications(vec![notification(
        "n1",
        NotificationKind::CommunityTripJoinRequest,
        5,
    )]);
    app.notifications.refresh().await.unwrap();

    // Another admin's device approved it.
    app.handle
        .push(ServerEvent::JoinRequestApproved {
            notification_id: NotificationId::new("n1"),
        })
        .await;
    app.pump().await;

    let n1 = app.notifications.get(&NotificationId::new("n1")).unwrap();
    assert_eq!(n1.action_taken, ActionTaken::Approved);
    assert!(n1.is_read);
    // No backend call was made for the mirrored resolution.
    assert_eq!(app.backend.calls(), vec!["fetch".to_string()]);
}

#[tokio::test]
async fn test_gateway_failure_leaves_state_and_surfaces_one_toast() {
    let mut app = TestApp::new();
    app.backend
        .seed_notifications(vec![notification("n1", NotificationKind::Generic, 5)]);
    app.notifications.refresh().await.unwrap();

    app.backend.fail_next("backend down");
    app.notifications
        .toggle_favorite(&NotificationId::new("n1"))
        .await
        .unwrap_err();

    let n1 = app.notifications.get(&NotificationId::new("n1")).unwrap();
    assert!(!n1.is_favorite);
    assert_eq!(app.notifications.favorite_count(), 0);

    match app.toasts.recv().await.unwrap() {
        UiEvent::Error { context, message } => {
            assert_eq!(context, "favorite notification");
            assert_eq!(message, "backend down");
        }
    }
    assert!(app.toasts.try_recv().is_err());
}
