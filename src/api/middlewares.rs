use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::acme::envelope::Envelope;
use crate::api::errors::ApiError;

/// Log every request with a fresh request id
pub async fn logging_middleware<B>(req: Request<B>, next: Next<B>) -> Response {
    let request_id = Uuid::new_v4();
    let path = req.uri().path().to_owned();
    let method = req.method().clone();

    let start = Instant::now();
    info!(%request_id, "Request started: {} {}", method, path);

    let res = next.run(req).await;

    let duration = start.elapsed();
    info!(
        %request_id,
        status = res.status().as_u16(),
        "Request completed: {} {} - {:?}",
        method,
        path,
        duration
    );

    res
}

/// Replace a `{protected, payload, signature}` body with its decoded payload
///
/// Nothing in the envelope is verified.
pub async fn unwrap_envelope(req: Request<Body>, next: Next<Body>) -> Result<Response, ApiError> {
    let (mut parts, body) = req.into_parts();
    let bytes = hyper::body::to_bytes(body)
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read request body: {}", e)))?;

    let payload = Envelope::unwrap_payload(&bytes)?;
    debug!("Unwrapped {} byte payload from envelope", payload.len());

    parts
        .headers
        .insert(header::CONTENT_LENGTH, HeaderValue::from(payload.len()));
    let req = Request::from_parts(parts, Body::from(payload));

    Ok(next.run(req).await)
}
