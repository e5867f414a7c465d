mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use support::{TestApp, tick, timestamp};

#[tokio::test]
async fn test_only_author_may_edit_or_delete() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let bob = app.sign_up("bob").await;

    let board = app.create_board(&alice, "Cats").await;
    assert!(board.starts_with("/boards/"));

    let posted = app
        .send(
            Method::POST,
            &format!("{board}/messages"),
            Some(&bob),
            Some(json!({ "text": "hello" })),
        )
        .await;
    assert_eq!(posted.status, StatusCode::CREATED);
    let message = posted.location().to_string();
    assert!(message.starts_with(&format!("{board}/messages/")));

    let original = app.get(&message, &bob).await;
    let posted_at = timestamp(&original.body["timestamp"]);
    assert_eq!(timestamp(&original.body["last_edited"]), posted_at);

    tick().await;
    let edited = app
        .send(
            Method::PATCH,
            &message,
            Some(&bob),
            Some(json!({ "text": "hello there" })),
        )
        .await;
    assert_eq!(edited.status, StatusCode::OK);
    assert_eq!(edited.body["text"], "hello there");
    assert_eq!(timestamp(&edited.body["timestamp"]), posted_at);
    assert!(timestamp(&edited.body["last_edited"]) > posted_at);

    let foreign_edit = app
        .send(
            Method::PATCH,
            &message,
            Some(&alice),
            Some(json!({ "text": "mine now" })),
        )
        .await;
    assert_eq!(foreign_edit.status, StatusCode::FORBIDDEN);

    let foreign_delete = app.send(Method::DELETE, &message, Some(&alice), None).await;
    assert_eq!(foreign_delete.status, StatusCode::FORBIDDEN);

    let unchanged = app.get(&message, &alice).await;
    assert_eq!(unchanged.body["text"], "hello there");

    let deleted = app.send(Method::DELETE, &message, Some(&bob), None).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body, json!({}));

    let gone = app.get(&message, &bob).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_board_view_shows_creator_and_first_message() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let board = app.create_board(&alice, "Dogs").await;

    let empty = app.get(&board, &alice).await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body["topic"], "Dogs");
    assert_eq!(empty.body["created_by"]["username"], "alice");
    assert!(empty.body["first_message"].is_null());

    for text in ["first", "second"] {
        app.send(
            Method::POST,
            &format!("{board}/messages"),
            Some(&alice),
            Some(json!({ "text": text })),
        )
        .await;
    }

    let view = app.get(&board, &alice).await;
    assert_eq!(view.body["first_message"]["text"], "first");

    let listed = app
        .get(&format!("{board}/messages?page=0&elements=10"), &alice)
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    let texts: Vec<&str> = listed
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|message| message["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, ["first", "second"]);
}

#[tokio::test]
async fn test_malformed_and_unknown_ids_are_not_found() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;

    let malformed = app.get("/boards/not-a-uuid", &alice).await;
    assert_eq!(malformed.status, StatusCode::NOT_FOUND);

    let unknown = app
        .get(&format!("/boards/{}", uuid::Uuid::new_v4()), &alice)
        .await;
    assert_eq!(unknown.status, StatusCode::NOT_FOUND);

    let user = app.get("/users/12345", &alice).await;
    assert_eq!(user.status, StatusCode::NOT_FOUND);

    let post_to_missing = app
        .send(
            Method::POST,
            &format!("/boards/{}/messages", uuid::Uuid::new_v4()),
            Some(&alice),
            Some(json!({ "text": "anyone?" })),
        )
        .await;
    assert_eq!(post_to_missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_message_lookup_is_scoped_to_board() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let cats = app.create_board(&alice, "Cats").await;
    let dogs = app.create_board(&alice, "Dogs").await;

    let posted = app
        .send(
            Method::POST,
            &format!("{cats}/messages"),
            Some(&alice),
            Some(json!({ "text": "meow" })),
        )
        .await;
    let message_id = posted.location().rsplit('/').next().unwrap().to_string();

    let wrong_board = app
        .get(&format!("{dogs}/messages/{message_id}"), &alice)
        .await;
    assert_eq!(wrong_board.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_text_is_rejected() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let board = app.create_board(&alice, "Cats").await;

    let response = app
        .send(
            Method::POST,
            &format!("{board}/messages"),
            Some(&alice),
            Some(json!({ "text": "" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["field"], "text");

    let response = app
        .send(Method::POST, "/boards", Some(&alice), Some(json!({})))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["field"], "topic");
}

#[tokio::test]
async fn test_user_profile_lists_created_boards() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    app.create_board(&alice, "Cats").await;
    app.create_board(&alice, "Dogs").await;

    let users = app.get("/users?page=0&elements=10", &alice).await;
    assert_eq!(users.status, StatusCode::OK);
    let topics: Vec<&str> = users.body[0]["boards"]
        .as_array()
        .unwrap()
        .iter()
        .map(|board| board["topic"].as_str().unwrap())
        .collect();
    assert_eq!(topics, ["Cats", "Dogs"]);
}

#[tokio::test]
async fn test_message_page_size_limit() {
    let app = TestApp::new();
    let alice = app.sign_up("alice").await;
    let board = app.create_board(&alice, "Cats").await;

    let too_many = app
        .get(&format!("{board}/messages?page=0&elements=51"), &alice)
        .await;
    assert_eq!(too_many.status, StatusCode::BAD_REQUEST);
    assert_eq!(too_many.body["field"], "elements");

    let at_limit = app
        .get(&format!("{board}/messages?page=0&elements=50"), &alice)
        .await;
    assert_eq!(at_limit.status, StatusCode::OK);
    assert_eq!(at_limit.body, json!([]));
}
