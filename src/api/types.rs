use std::sync::Arc;
use axum::extract::FromRequestParts;
use http::header;
use http::request::Parts;

use crate::acme::{AcmeService, BaseUrl};
use crate::api::errors::ApiError;
use crate::types::Scheme;

/// API state shared between handlers
#[derive(Clone)]
pub struct ApiState {
    /// Issuance service
    pub service: Arc<AcmeService>,
    /// Scheme of the listener, used when the request URI carries none
    pub scheme: Scheme,
}

impl ApiState {
    pub fn new(service: Arc<AcmeService>, scheme: Scheme) -> Self {
        Self { service, scheme }
    }
}

/// Scheme and host the client addressed, taken from the request
#[axum::async_trait]
impl FromRequestParts<ApiState> for BaseUrl {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &ApiState) -> Result<Self, Self::Rejection> {
        let host = parts
            .headers
            .get(header::HOST)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
            .or_else(|| parts.uri.authority().map(|authority| authority.to_string()))
            .ok_or_else(|| ApiError::BadRequest("Missing Host header".to_string()))?;

        let scheme = match parts.uri.scheme_str() {
            Some("http") => Scheme::Http,
            Some("https") => Scheme::Https,
            _ => state.scheme,
        };

        BaseUrl::new(scheme, &host)
            .map_err(|e| ApiError::BadRequest(format!("Invalid Host header: {}", e)))
    }
}
