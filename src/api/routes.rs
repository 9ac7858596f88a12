use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::acme::{
    CERTIFICATE_PREFIX, DIRECTORY_PATH, FINALIZE_PREFIX, NEW_ACCOUNT_PATH, NEW_NONCE_PATH,
    NEW_ORDER_PATH, ORDER_PREFIX,
};
use crate::api::handlers::{
    account::new_account,
    directory::directory,
    nonce::new_nonce,
    order::{finalize, get_certificate, get_order, new_order},
};
use crate::api::middlewares::{logging_middleware, unwrap_envelope};
use crate::api::types::ApiState;

/// Create router with all ACME routes
///
/// `new-order` and `finalize` see only the decoded envelope payload.
pub fn create_router(state: ApiState) -> Router {
    Router::new()
        .route(DIRECTORY_PATH, get(directory))
        .route(NEW_NONCE_PATH, get(new_nonce).post(new_nonce))
        .route(NEW_ACCOUNT_PATH, post(new_account))
        .route(
            NEW_ORDER_PATH,
            post(new_order).layer(middleware::from_fn(unwrap_envelope)),
        )
        .route(
            &format!("{}:id", FINALIZE_PREFIX),
            post(finalize).layer(middleware::from_fn(unwrap_envelope)),
        )
        .route(&format!("{}:id", ORDER_PREFIX), get(get_order))
        .route(&format!("{}:id", CERTIFICATE_PREFIX), get(get_certificate))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(logging_middleware)),
        )
        .with_state(state)
}
