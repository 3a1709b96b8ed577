// HTTP route handlers for the question relay

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, error, info};

use crate::store::QuestionStore;

/// Upper bound on an accepted payload
pub const MAX_PAYLOAD_BYTES: usize = 64 * 1024 * 1024;

/// POST / - Store the payload verbatim, replacing any previous question
pub async fn write_question(State(store): State<QuestionStore>, body: Body) -> Response {
    let payload = match to_bytes(body, MAX_PAYLOAD_BYTES).await {
        Ok(payload) => payload,
        Err(e) => {
            error!(error = %e, "Failed to read request body");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read request body",
            )
                .into_response();
        }
    };

    info!(bytes = payload.len(), "Question received");
    store.put(payload);

    StatusCode::OK.into_response()
}

/// GET / - Serve the last stored payload
pub async fn read_question(State(store): State<QuestionStore>) -> Response {
    match store.get() {
        Some(payload) => {
            debug!(bytes = payload.len(), "Question served");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                payload,
            )
                .into_response()
        }
        None => {
            debug!("No question stored yet");
            (StatusCode::NOT_FOUND, "No question available").into_response()
        }
    }
}
