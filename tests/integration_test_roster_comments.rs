mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

async fn comment(app: &TestApp, event_id: &str, author_id: &str, content: &str, parent_id: Option<&str>) -> (StatusCode, Value) {
    app.request("POST", "/api/v1/comments", Some(json!({
        "event_id": event_id,
        "author_id": author_id,
        "content": content,
        "parent_id": parent_id,
    }))).await
}

async fn comment_id(app: &TestApp, event_id: &str, author_id: &str, content: &str, parent_id: Option<&str>) -> String {
    let (status, body) = comment(app, event_id, author_id, content, parent_id).await;
    assert_eq!(status, StatusCode::CREATED, "comment failed: {}", body);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_participant_leaves_event() {
    let app = TestApp::new().await;
    let (event_id, edit_id) = app.create_event(Some(1)).await;
    let participant_id = app.join(&event_id, &edit_id, "Ada", "ada@example.org").await;

    let (status, _) = app.request("DELETE", &format!("/api/v1/participants/{}", participant_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.request("DELETE", &format!("/api/v1/participants/{}", participant_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The freed seat can be taken again.
    app.join(&event_id, &edit_id, "Brian", "brian@example.org").await;
}

#[tokio::test]
async fn test_organizer_removes_participant() {
    let app = TestApp::new().await;
    let (event_id, edit_id) = app.create_event(None).await;
    let (_, other_edit_id) = app.create_event(None).await;
    let participant_id = app.join(&event_id, &edit_id, "Ada", "ada@example.org").await;

    let (status, _) = app.request("DELETE", &format!("/api/v1/participants/{}/{}", participant_id, other_edit_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.count("participants").await, 1);

    let (status, _) = app.request("DELETE", &format!("/api/v1/participants/{}/{}", participant_id, edit_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.count("participants").await, 0);
}

#[tokio::test]
async fn test_removed_participant_takes_comments() {
    let app = TestApp::new().await;
    let (event_id, edit_id) = app.create_event(None).await;
    let ada = app.join(&event_id, &edit_id, "Ada", "ada@example.org").await;
    let brian = app.join(&event_id, &edit_id, "Brian", "brian@example.org").await;

    let root = comment_id(&app, &event_id, &ada, "Who brings drinks?", None).await;
    comment_id(&app, &event_id, &brian, "Me", Some(&root)).await;
    comment_id(&app, &event_id, &brian, "Parking?", None).await;

    let (status, _) = app.request("DELETE", &format!("/api/v1/participants/{}", ada), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, threads) = app.request("GET", &format!("/api/v1/events/{}/comments", event_id), None).await;
    let threads = threads.as_array().unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0]["content"], "Parking?");
    assert_eq!(app.count("comments").await, 1);
}

#[tokio::test]
async fn test_comment_tree_listing() {
    let app = TestApp::new().await;
    let (event_id, edit_id) = app.create_event(None).await;
    let ada = app.join(&event_id, &edit_id, "Ada", "ada@example.org").await;
    let brian = app.join(&event_id, &edit_id, "Brian", "brian@example.org").await;

    let root = comment_id(&app, &event_id, &ada, "Potluck?", None).await;
    let reply = comment_id(&app, &event_id, &brian, "Salad from me", Some(&root)).await;
    comment_id(&app, &event_id, &ada, "Great", Some(&reply)).await;
    comment_id(&app, &event_id, &brian, "Rain plan?", None).await;

    let (status, threads) = app.request("GET", &format!("/api/v1/events/{}/comments", event_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let threads = threads.as_array().unwrap();
    assert_eq!(threads.len(), 2);
    assert_eq!(threads[0]["content"], "Potluck?");
    assert_eq!(threads[0]["author_name"], "Ada");
    assert_eq!(threads[0]["replies"][0]["author_name"], "Brian");
    assert_eq!(threads[0]["replies"][0]["replies"][0]["content"], "Great");
    assert_eq!(threads[1]["content"], "Rain plan?");

    let raw = serde_json::to_string(threads).unwrap();
    assert!(!raw.contains(&ada), "listing leaked a participant id");

    let (status, _) = app.request("GET", "/api/v1/events/missing/comments", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_comment_rules() {
    let app = TestApp::new().await;
    let (event_id, edit_id) = app.create_event(None).await;
    let (other_event, other_edit) = app.create_event(None).await;
    let ada = app.join(&event_id, &edit_id, "Ada", "ada@example.org").await;
    let outsider = app.join(&other_event, &other_edit, "Olga", "olga@example.org").await;

    let (status, _) = comment(&app, &event_id, &outsider, "Hi", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = comment(&app, &event_id, &ada, "   ", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let foreign_parent = comment_id(&app, &other_event, &outsider, "Elsewhere", None).await;
    let (status, body) = comment(&app, &event_id, &ada, "Reply", Some(&foreign_parent)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Parent"));

    let (status, _) = comment(&app, &event_id, &ada, "Reply", Some("no-such-comment")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = comment(&app, "no-such-event", &ada, "Hi", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_comment_removes_subtree() {
    let app = TestApp::new().await;
    let (event_id, edit_id) = app.create_event(None).await;
    let ada = app.join(&event_id, &edit_id, "Ada", "ada@example.org").await;
    let brian = app.join(&event_id, &edit_id, "Brian", "brian@example.org").await;

    let root = comment_id(&app, &event_id, &ada, "Root", None).await;
    let reply = comment_id(&app, &event_id, &brian, "Reply", Some(&root)).await;
    comment_id(&app, &event_id, &ada, "Nested", Some(&reply)).await;
    let keep = comment_id(&app, &event_id, &brian, "Other thread", None).await;

    // Not the author, not the organizer.
    let (status, _) = app.request("DELETE", &format!("/api/v1/comments/{}/{}", root, brian), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.count("comments").await, 4);

    let (status, _) = app.request("DELETE", &format!("/api/v1/comments/{}/{}", root, ada), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.count("comments").await, 1);

    // The organizer may delete any comment.
    let (status, _) = app.request("DELETE", &format!("/api/v1/comments/{}/{}", keep, edit_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.count("comments").await, 0);
}
