//! HTTP API for web front-ends.
//!
//! One [`ConversationEngine`] is shared behind an async mutex, so requests are answered
//! one at a time, matching the single-session model of the engine.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::chat::attachments::Attachment;
use crate::chat::history::ConversationTurn;
use crate::chat::ConversationEngine;
use crate::config::ArcadiaConfig;

#[derive(Clone)]
pub struct AppState {
    engine: Arc<Mutex<ConversationEngine>>,
    model: Arc<str>,
}

impl AppState {
    pub fn new(engine: ConversationEngine, model: &str) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            model: Arc::from(model),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/history", get(history).delete(clear_history))
        .route("/api/health", get(health))
        .with_state(state)
}

async fn chat(State(state): State<AppState>, Json(req): Json<ChatRequest>) -> Json<ChatResponse> {
    let mut engine = state.engine.lock().await;
    let reply = engine.respond(&req.message, &req.attachments).await;
    Json(ChatResponse { reply })
}

async fn history(State(state): State<AppState>) -> Json<Vec<ConversationTurn>> {
    let engine = state.engine.lock().await;
    Json(engine.turns())
}

async fn clear_history(State(state): State<AppState>) -> StatusCode {
    state.engine.lock().await.clear_history();
    StatusCode::NO_CONTENT
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        model: state.model.to_string(),
    })
}

/// Serve the API on `server.host:server.port` until ctrl-c.
pub async fn serve(config: ArcadiaConfig, engine: ConversationEngine) -> Result<()> {
    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(engine, &config.llm.model);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Arcadia API listening at http://{bind_addr}/api");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
