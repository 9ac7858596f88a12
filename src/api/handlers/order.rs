use axum::extract::{Path, State};
use bytes::Bytes;
use http::StatusCode;
use tracing::{debug, info};

use crate::acme::types::{CsrMessage, NewOrderRequest};
use crate::acme::{AcmeService, BaseUrl, OrderId};
use crate::api::errors::{ApiError, ApiResult};
use crate::api::response::AcmeResponse;
use crate::api::types::ApiState;
use crate::ca::csr::CertificateRequest;

const PEM_CERTIFICATE_CHAIN: &str = "application/pem-certificate-chain";

fn parse_id(raw: &str) -> ApiResult<OrderId> {
    raw.parse::<OrderId>().map_err(ApiError::from)
}

/// `POST /new-order`
///
/// An empty payload is read as `{}`.
pub async fn new_order(
    State(state): State<ApiState>,
    base: BaseUrl,
    body: Bytes,
) -> ApiResult<AcmeResponse> {
    let request = NewOrderRequest::from_json(&body)?;

    let order = state.service.new_order(request)?;
    let response = state.service.order_response(&order, &base);

    AcmeResponse::json(StatusCode::CREATED, &response)?
        .with_location(&AcmeService::order_url(&base, order.id))
}

/// `POST /finalize/:id`
pub async fn finalize(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    base: BaseUrl,
    body: Bytes,
) -> ApiResult<AcmeResponse> {
    let id = parse_id(&id)?;
    // Unknown orders are reported before the payload is looked at
    state.service.order(id)?;

    let message = CsrMessage::from_json(&body)?;
    let request = CertificateRequest::from_base64url(&message.csr)?;
    debug!(
        "Finalizing order {} for {}",
        id,
        request.common_name().unwrap_or("<no common name>")
    );

    let order = state.service.finalize(id, &request)?;
    info!("Finalized order {}", id);
    let response = state.service.order_response(&order, &base);

    AcmeResponse::json(StatusCode::OK, &response)?
        .with_location(&AcmeService::order_url(&base, id))
}

/// `GET /order/:id`
pub async fn get_order(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    base: BaseUrl,
) -> ApiResult<AcmeResponse> {
    let order = state.service.order(parse_id(&id)?)?;
    AcmeResponse::json(StatusCode::OK, &state.service.order_response(&order, &base))
}

/// `GET /certificate/:id`
pub async fn get_certificate(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> ApiResult<AcmeResponse> {
    let pem = state.service.certificate_pem(parse_id(&id)?)?;
    Ok(AcmeResponse::raw(
        StatusCode::OK,
        PEM_CERTIFICATE_CHAIN,
        pem.into_bytes(),
    ))
}
