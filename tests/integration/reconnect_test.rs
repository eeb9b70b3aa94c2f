//! Integration tests for connection lifecycle and room resynchronization.

use triphub_core::types::id::TripId;
use triphub_realtime::ConnectionState;

use crate::helpers::{self, TestApp};

fn event_name(frame: &str) -> String {
    let value: serde_json::Value = serde_json::from_str(frame).unwrap();
    value["event"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_connect_joins_admin_room_first() {
    let app = TestApp::new();
    app.connect().await;

    let frames = app.handle.sent_frames().await;
    assert_eq!(event_name(&frames[0]), "join-admin-room");
    assert_eq!(app.handle.credential().await.as_deref(), Some("test-token"));
    assert!(app.manager.current_state().is_connected());
}

#[tokio::test]
async fn test_trip_join_requested_before_open_is_buffered() {
    let app = TestApp::new();
    app.manager.connect(Some("test-token")).await;

    // Not open yet: the join is recorded but no frame goes out.
    app.chat.join_room().await.unwrap();
    assert!(app.handle.sent_frames().await.is_empty());

    app.handle.open().await;
    let frames = app.handle.wait_for_sent(2).await;
    assert_eq!(event_name(&frames[0]), "join-admin-room");
    assert_eq!(event_name(&frames[1]), "join-trip");
}

#[tokio::test]
async fn test_reconnect_replays_both_room_joins() {
    let app = TestApp::new();
    app.connect().await;
    app.manager
        .join_trip_room(TripId::new(helpers::TRIP))
        .await
        .unwrap();
    app.handle.wait_for_sent(2).await;
    app.handle.clear_sent().await;

    app.handle.drop_and_reconnect().await;

    // Both memberships come back, admin room first, with no action from
    // the consumer.
    let frames = app.handle.wait_for_sent(2).await;
    assert_eq!(event_name(&frames[0]), "join-admin-room");
    assert_eq!(event_name(&frames[1]), "join-trip");
    assert!(frames[1].contains(helpers::TRIP));
}

#[tokio::test]
async fn test_drop_without_reconnect_reports_reconnecting() {
    let app = TestApp::new();
    app.connect().await;

    let mut state = app.manager.state();
    app.handle.drop_link().await;
    state
        .wait_for(|s| *s == ConnectionState::Reconnecting)
        .await
        .unwrap();

    // The membership survives the outage and replays once the link is back.
    app.handle.clear_sent().await;
    app.handle.drop_and_reconnect().await;
    let frames = app.handle.wait_for_sent(1).await;
    assert_eq!(event_name(&frames[0]), "join-admin-room");
}

#[tokio::test]
async fn test_switching_trips_replaces_the_room() {
    let app = TestApp::new();
    app.connect().await;
    app.manager
        .join_trip_room(TripId::new("t1"))
        .await
        .unwrap();
    app.manager
        .join_trip_room(TripId::new("t2"))
        .await
        .unwrap();
    app.handle.wait_for_sent(3).await;
    app.handle.clear_sent().await;

    // Only the latest trip membership is resynchronized.
    app.handle.drop_and_reconnect().await;
    let frames = app.handle.wait_for_sent(2).await;
    assert_eq!(frames.len(), 2);
    assert!(frames[1].contains("t2"));
    assert!(!frames[1].contains("\"t1\""));
}
