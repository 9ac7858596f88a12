use axum::extract::State;
use axum::http::StatusCode;

use crate::acme::BaseUrl;
use crate::api::errors::ApiResult;
use crate::api::response::AcmeResponse;
use crate::api::types::ApiState;

/// `POST /new-account`; every caller gets the same valid account
pub async fn new_account(State(state): State<ApiState>, base: BaseUrl) -> ApiResult<AcmeResponse> {
    AcmeResponse::json(StatusCode::OK, &state.service.new_account(&base))
}
