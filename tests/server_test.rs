mod helpers;

use arcadia::server::{router, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use helpers::{engine, offline_researcher, Behavior, FakeGenerator};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

fn app(tmp: &TempDir) -> axum::Router {
    let generator = FakeGenerator::new(Behavior::Fixed("Ciao dal modello".into()));
    let engine = engine(generator, offline_researcher(), tmp.path(), 30);
    router(AppState::new(engine, "phi4-mini"))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_chat(body: Value) -> Request<Body> {
    Request::post("/api/chat")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn health_reports_model() {
    let tmp = TempDir::new().unwrap();
    let response = app(&tmp)
        .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"status": "ok", "model": "phi4-mini"})
    );
}

#[tokio::test]
async fn chat_replies_and_records_history() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    let response = app
        .clone()
        .oneshot(post_chat(json!({"message": "Ciao"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["reply"], "Ciao dal modello");

    let response = app
        .oneshot(Request::get("/api/history").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let turns = body_json(response).await;
    assert_eq!(turns.as_array().unwrap().len(), 2);
    assert_eq!(turns[0]["role"], "user");
    assert_eq!(turns[1]["content"], "Ciao dal modello");
}

#[tokio::test]
async fn empty_message_is_answered_not_rejected() {
    let tmp = TempDir::new().unwrap();
    let response = app(&tmp)
        .oneshot(post_chat(json!({"message": "   ", "attachments": []})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["reply"], "Non hai scritto nulla.");
}

#[tokio::test]
async fn delete_history_empties_it() {
    let tmp = TempDir::new().unwrap();
    let app = app(&tmp);

    app.clone()
        .oneshot(post_chat(json!({"message": "Ciao"})))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(Request::delete("/api/history").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(Request::get("/api/history").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(body_json(response).await, json!([]));
}
