use axum::body::{self, Full};
use axum::http::header::{self, HeaderName};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::api::errors::{ApiError, ApiResult};

/// What a handler wants written as the response body
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// No body at all
    Empty,
    /// JSON-encoded value
    Json(serde_json::Value),
    /// Pre-encoded bytes with their content type
    Raw {
        content_type: &'static str,
        bytes: Vec<u8>,
    },
}

/// Handler result interpreted uniformly by the routing layer
#[derive(Debug, Clone)]
pub struct AcmeResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl AcmeResponse {
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::Empty,
        }
    }

    /// JSON body; fails with a 500 if `value` cannot be encoded
    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> ApiResult<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| ApiError::Internal(format!("Failed to encode response: {}", e)))?;
        Ok(Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::Json(value),
        })
    }

    pub fn raw(status: StatusCode, content_type: &'static str, bytes: Vec<u8>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: ResponseBody::Raw {
                content_type,
                bytes,
            },
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set `Location`; a value that is not a valid header is a server error
    pub fn with_location(self, url: &str) -> ApiResult<Self> {
        let value = HeaderValue::from_str(url)
            .map_err(|e| ApiError::Internal(format!("Invalid Location header: {}", e)))?;
        Ok(self.with_header(header::LOCATION, value))
    }
}

impl IntoResponse for AcmeResponse {
    fn into_response(self) -> Response {
        let mut headers = self.headers;
        let bytes = match self.body {
            ResponseBody::Empty => Vec::new(),
            ResponseBody::Json(value) => match serde_json::to_vec(&value) {
                Ok(bytes) => {
                    headers.insert(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static("application/json"),
                    );
                    bytes
                }
                Err(e) => {
                    return ApiError::Internal(format!("Failed to encode response: {}", e))
                        .into_response()
                }
            },
            ResponseBody::Raw {
                content_type,
                bytes,
            } => {
                headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
                bytes
            }
        };

        let mut response = Response::new(body::boxed(Full::from(bytes)));
        *response.status_mut() = self.status;
        *response.headers_mut() = headers;
        response
    }
}
