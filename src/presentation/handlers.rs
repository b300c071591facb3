// HTTP request handlers
use crate::domain::chat::{ChatError, ChatMessage, ChatState};
use crate::domain::contact::{ContactError, ContactOptions, ContactRequest};
use crate::domain::vision::VisionVerdict;
use crate::infrastructure::chunked_json::stream_from_subscription;
use crate::infrastructure::http_response::{accepts_brotli, json_response, json_response_with_status};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
struct ChatTranscript {
    state: ChatState,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VisionFeedView<'a> {
    frame: u32,
    image_url: String,
    newest: Option<&'a VisionVerdict>,
    verdicts: Vec<&'a VisionVerdict>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

fn respond(result: Result<Response, StatusCode>) -> Response {
    match result {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

async fn error_response(status: StatusCode, message: String, compress: bool) -> Response {
    respond(json_response_with_status(status, &ErrorBody { error: message }, compress).await)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current telemetry window, oldest first
pub async fn get_telemetry(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let window = state.simulation.window().await;
    respond(json_response(&window, accepts_brotli(&headers)).await)
}

/// Latest telemetry snapshot
pub async fn get_latest(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.simulation.latest().await;
    respond(json_response(&snapshot, accepts_brotli(&headers)).await)
}

/// List dashboard modules
pub async fn list_dashboards(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let modules = state.dashboard_service.modules();
    respond(json_response(&modules, accepts_brotli(&headers)).await)
}

/// Build one dashboard module from the current window
pub async fn get_dashboard(
    Path(id): Path<String>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let compress = accepts_brotli(&headers);
    let window = state.simulation.window().await;

    match state.dashboard_service.build(&id, &window) {
        Some(dashboard) => respond(json_response(&dashboard, compress).await),
        None => error_response(StatusCode::NOT_FOUND, format!("unknown dashboard `{}`", id), compress).await,
    }
}

/// Recent vision verdicts, newest first
pub async fn get_vision(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let feed = state.simulation.vision_feed().await;
    let view = VisionFeedView {
        frame: feed.frame(),
        image_url: feed.frame_image_url(),
        newest: feed.newest(),
        verdicts: feed.verdicts().collect(),
    };
    respond(json_response(&view, accepts_brotli(&headers)).await)
}

/// Live telemetry and vision events as a chunked stream
pub async fn stream_live(headers: HeaderMap, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    stream_from_subscription(
        state.simulation.subscribe(),
        state.simulation.shutdown_token(),
        accepts_brotli(&headers),
    )
    .await
}

/// Conversation so far
pub async fn get_chat(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let (chat_state, messages) = state.chat_service.transcript().await;
    let transcript = ChatTranscript {
        state: chat_state,
        messages,
    };
    respond(json_response(&transcript, accepts_brotli(&headers)).await)
}

/// Send a chat message and return the assistant's reply
pub async fn post_chat(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ChatRequest>,
) -> Response {
    let compress = accepts_brotli(&headers);
    let snapshot = state.simulation.latest().await;

    match state.chat_service.send(&request.message, Some(snapshot)).await {
        Ok(reply) => respond(json_response(&reply, compress).await),
        Err(e) => {
            let status = match e {
                ChatError::Busy => StatusCode::CONFLICT,
                ChatError::EmptyMessage => StatusCode::BAD_REQUEST,
                ChatError::Closed => StatusCode::GONE,
            };
            error_response(status, e.to_string(), compress).await
        }
    }
}

/// Simulated contact form submission
pub async fn post_contact(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(request): Json<ContactRequest>,
) -> Response {
    let compress = accepts_brotli(&headers);

    match state.contact_service.submit(request).await {
        Ok(receipt) => respond(json_response(&receipt, compress).await),
        Err(e @ ContactError::MissingField(_)) => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, e.to_string(), compress).await
        }
    }
}

/// Option lists for the contact form
pub async fn contact_options(headers: HeaderMap) -> Response {
    respond(json_response(&ContactOptions::all(), accepts_brotli(&headers)).await)
}
