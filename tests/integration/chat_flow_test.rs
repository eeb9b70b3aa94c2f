//! Integration tests for the community-trip chat flows.

use triphub_core::types::id::MessageId;
use triphub_entity::MessageType;
use triphub_realtime::message::types::ServerEvent;
use triphub_realtime::UiEvent;

use crate::helpers::{message, TestApp};

#[tokio::test]
async fn test_push_and_fetch_race_never_duplicates() {
    let mut app = TestApp::new();
    app.connect().await;
    app.chat.join_room().await.unwrap();

    // The push wins the race against the REST fetch of the same message.
    app.handle
        .push(ServerEvent::NewMessage(message("m1", "first", 10)))
        .await;
    app.pump().await;

    app.backend
        .seed_messages(vec![message("m1", "first", 10), message("m2", "second", 5)]);
    app.chat.refresh().await.unwrap();

    let transcript = app.chat.transcript();
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].id, MessageId::new("m1"));
    assert_eq!(transcript[1].id, MessageId::new("m2"));
}

#[tokio::test]
async fn test_out_of_order_push_lands_by_creation_time() {
    let mut app = TestApp::new();
    app.connect().await;

    app.handle
        .push(ServerEvent::NewMessage(message("m2", "later", 5)))
        .await;
    app.pump().await;
    app.handle
        .push(ServerEvent::NewMessage(message("m1", "earlier", 60)))
        .await;
    app.pump().await;

    let transcript = app.chat.transcript();
    assert_eq!(transcript[0].id, MessageId::new("m1"));
    assert_eq!(transcript[1].id, MessageId::new("m2"));
}

#[tokio::test]
async fn test_send_confirmed_by_push_appears_once() {
    let mut app = TestApp::new();
    app.connect().await;

    app.chat.set_draft("on our way");
    app.chat.send(MessageType::Answer).await.unwrap();
    assert_eq!(app.chat.draft(), "");
    // No optimistic transcript entry.
    assert!(app.chat.transcript().is_empty());

    let frames = app.handle.wait_for_sent(2).await;
    assert!(frames[1].contains("send-message"));
    assert!(frames[1].contains("on our way"));

    app.handle
        .push(ServerEvent::NewMessage(message("m1", "on our way", 0)))
        .await;
    app.pump().await;
    assert_eq!(app.chat.transcript().len(), 1);
}

#[tokio::test]
async fn test_server_rejection_restores_the_draft() {
    let mut app = TestApp::new();
    app.connect().await;

    app.chat.set_draft("hello there");
    app.chat.send(MessageType::General).await.unwrap();
    assert_eq!(app.chat.draft(), "");

    app.handle
        .push(ServerEvent::Error {
            code: Some("SEND_FAILED".to_string()),
            message: "message rejected".to_string(),
        })
        .await;
    app.pump().await;

    assert_eq!(app.chat.draft(), "hello there");
    assert!(app.chat.transcript().is_empty());
    match app.toasts.recv().await.unwrap() {
        UiEvent::Error { message, .. } => assert_eq!(message, "message rejected"),
    }
}

#[tokio::test]
async fn test_message_update_replaces_in_place() {
    let mut app = TestApp::new();
    app.connect().await;

    app.handle
        .push(ServerEvent::NewMessage(message("m1", "typo'd mesage", 10)))
        .await;
    app.pump().await;
    app.handle
        .push(ServerEvent::MessageUpdated(message("m1", "fixed message", 10)))
        .await;
    app.pump().await;

    let transcript = app.chat.transcript();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].body, "fixed message");
}

#[tokio::test]
async fn test_question_threads_group_answers() {
    let mut app = TestApp::new();
    app.connect().await;

    let question = {
        let mut m = message("q1", "where do we meet?", 60);
        m.message_type = MessageType::Question;
        m
    };
    let answer = {
        let mut m = message("a1", "at the harbor", 30);
        m.message_type = MessageType::Answer;
        m.parent_message_id = Some(MessageId::new("q1"));
        m
    };

    app.handle.push(ServerEvent::NewMessage(question)).await;
    app.pump().await;
    app.handle.push(ServerEvent::NewMessage(answer)).await;
    app.pump().await;

    let threads = app.chat.threads();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].question.id, MessageId::new("q1"));
    assert_eq!(threads[0].replies.len(), 1);
}
