pub mod envelope;
pub mod order;
pub mod registry;
pub mod service;
pub mod stubs;
pub mod types;
pub mod urls;

// Re-export key types
pub use envelope::Envelope;
pub use order::{Order, OrderId, OrderStatus};
pub use registry::OrderRegistry;
pub use service::AcmeService;
pub use urls::BaseUrl;

/// Fixed server-relative paths
pub const DIRECTORY_PATH: &str = "/directory";
pub const NEW_NONCE_PATH: &str = "/new-nonce";
pub const NEW_ACCOUNT_PATH: &str = "/new-account";
pub const NEW_ORDER_PATH: &str = "/new-order";
pub const REVOKE_CERT_PATH: &str = "/revoke-cert";
pub const KEY_CHANGE_PATH: &str = "/key-change";
pub const ORDERS_PATH: &str = "/orders";
pub const ORDER_PREFIX: &str = "/order/";
pub const FINALIZE_PREFIX: &str = "/finalize/";
pub const CERTIFICATE_PREFIX: &str = "/certificate/";
