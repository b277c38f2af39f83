use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tempfile::{TempDir, tempdir};
use tower::ServiceExt;

use messenger_api::{MessageService, router};
use messenger_db::MessageStore;

fn app() -> (TempDir, Router) {
    let dir = tempdir().unwrap();
    let store = MessageStore::new(dir.path().join("messenger.db"), "messenger");
    store.connect().unwrap();
    (dir, router(MessageService::new(Arc::new(store))))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn post(app: &Router, recipient: &str, message: &str, date: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/messenger/",
        Some(json!({
            "recipient_id": recipient,
            "sender_id": "u2",
            "message": message,
            "date_sent": date,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn post_then_get_by_recipient() {
    let (_dir, app) = app();
    let id = post(&app, "u1", "hi", "2023-01-01").await;
    post(&app, "u9", "not for u1", "2023-01-01").await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/messenger/u1?from_date=2023-01-01&to_date=2023-01-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let messages = body.as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["id"], id.as_str());
    assert_eq!(messages[0]["recipient_id"], "u1");
    assert_eq!(messages[0]["sender_id"], "u2");
    assert_eq!(messages[0]["message"], "hi");
    assert!(messages[0]["timestamp"].is_f64());
}

#[tokio::test]
async fn get_all_lists_everything() {
    let (_dir, app) = app();
    post(&app, "u1", "a", "2023-01-01").await;
    post(&app, "u3", "b", "2023-01-02").await;

    for uri in ["/messenger/", "/messenger"] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
    }
}

#[tokio::test]
async fn empty_range_is_an_empty_array() {
    let (_dir, app) = app();
    post(&app, "u1", "hi", "2023-01-01").await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/messenger/u1?from_date=2024-01-01&to_date=2024-01-31",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn patch_updates_only_given_fields() {
    let (_dir, app) = app();
    let id = post(&app, "u1", "hi", "2023-01-01").await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/messenger/{id}"),
        Some(json!({ "message": "edited" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["affected"], 1);

    let (_, body) = send(&app, Method::GET, "/messenger/", None).await;
    let message = &body.as_array().unwrap()[0];
    assert_eq!(message["message"], "edited");
    assert_eq!(message["recipient_id"], "u1");
    assert_eq!(message["sender_id"], "u2");
}

#[tokio::test]
async fn delete_by_query_ids() {
    let (_dir, app) = app();
    let a = post(&app, "u1", "a", "2023-01-01").await;
    let b = post(&app, "u1", "b", "2023-01-01").await;
    let c = post(&app, "u1", "c", "2023-01-01").await;

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/messenger/?ids={a},{b},already-gone"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["affected"], 2);

    let (_, body) = send(&app, Method::GET, "/messenger/", None).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec![c.as_str()]);
}

#[tokio::test]
async fn malformed_date_is_a_bad_request() {
    let (_dir, app) = app();

    let (status, body) = send(&app, Method::GET, "/messenger/u1?from_date=01-01-2023", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid date '01-01-2023': expected YYYY-MM-DD");

    let (status, body) = send(
        &app,
        Method::POST,
        "/messenger/",
        Some(json!({
            "recipient_id": "u1",
            "sender_id": "u2",
            "message": "hi",
            "date_sent": "soon",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("soon"));
}

#[tokio::test]
async fn closed_store_is_a_bad_request() {
    let dir = tempdir().unwrap();
    let store = Arc::new(MessageStore::new(dir.path().join("messenger.db"), "messenger"));
    store.connect().unwrap();
    let app = router(MessageService::new(store.clone()));
    store.close().unwrap();

    let (status, body) = send(&app, Method::GET, "/messenger/", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "table messenger is not connected");
}
