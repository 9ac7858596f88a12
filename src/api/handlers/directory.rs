use axum::extract::State;
use axum::http::StatusCode;
use tracing::debug;

use crate::acme::BaseUrl;
use crate::api::errors::ApiResult;
use crate::api::response::AcmeResponse;
use crate::api::types::ApiState;

/// `GET /directory`
///
/// Endpoint URLs are rebuilt for every request from the scheme and host the
/// client used.
pub async fn directory(State(state): State<ApiState>, base: BaseUrl) -> ApiResult<AcmeResponse> {
    debug!("Directory requested via {}", base);
    AcmeResponse::json(StatusCode::OK, &state.service.directory(&base))
}
