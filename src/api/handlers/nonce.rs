use axum::extract::State;
use axum::http::header::{HeaderName, CACHE_CONTROL};
use axum::http::{HeaderValue, StatusCode};

use crate::api::response::AcmeResponse;
use crate::api::types::ApiState;

pub const REPLAY_NONCE: &str = "replay-nonce";

/// `GET|POST /new-nonce`
pub async fn new_nonce(State(state): State<ApiState>) -> AcmeResponse {
    AcmeResponse::empty(StatusCode::OK)
        .with_header(
            HeaderName::from_static(REPLAY_NONCE),
            HeaderValue::from_static(state.service.nonce()),
        )
        .with_header(CACHE_CONTROL, HeaderValue::from_static("no-store"))
}
