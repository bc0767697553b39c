//! Local stand-in for the Gemini endpoint, bound to 127.0.0.1:0.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::Mutex;

pub enum UpstreamReply {
    Ok(Value),
    Status(StatusCode, Value),
}

#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub key: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct UpstreamState {
    reply: Arc<UpstreamReply>,
    requests: Arc<Mutex<Vec<SeenRequest>>>,
}

pub struct MockUpstream {
    pub url: String,
    requests: Arc<Mutex<Vec<SeenRequest>>>,
}

impl MockUpstream {
    pub async fn last_request(&self) -> Option<SeenRequest> {
        self.requests.lock().await.last().cloned()
    }

    pub async fn request_count(&self) -> usize {
        self.requests.lock().await.len()
    }
}

/// Wraps `text` the way Gemini wraps a model answer.
pub fn gemini_reply(text: &str) -> Value {
    json!({
        "candidates": [
            {"content": {"parts": [{"text": text}], "role": "model"}, "finishReason": "STOP"}
        ]
    })
}

pub async fn spawn_upstream(reply: UpstreamReply) -> MockUpstream {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = UpstreamState {
        reply: Arc::new(reply),
        requests: requests.clone(),
    };
    let app = Router::new()
        .route("/generate", post(handle_generate))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockUpstream {
        url: format!("http://{addr}/generate"),
        requests,
    }
}

async fn handle_generate(
    State(state): State<UpstreamState>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    state.requests.lock().await.push(SeenRequest {
        key: query.get("key").cloned(),
        body,
    });
    match state.reply.as_ref() {
        UpstreamReply::Ok(value) => (StatusCode::OK, Json(value.clone())).into_response(),
        UpstreamReply::Status(code, value) => (*code, Json(value.clone())).into_response(),
    }
}
