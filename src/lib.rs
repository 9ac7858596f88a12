//! ACME CA - reduced ACME certificate authority
//!
//! Issues X.509 certificates signed by a locally held CA over a small,
//! ACME-shaped HTTP API

// Foundational layer
pub mod error;
pub mod types;
pub mod config;
pub mod telemetry;

// Core layer
pub mod ca;
pub mod crypto;

// Application layer
pub mod acme;

// Interface layer
pub mod api;

// Public key types
pub use crate::error::Error;
pub use crate::types::{Result, Scheme};
pub use crate::acme::AcmeService;
pub use crate::api::ApiServer;
pub use crate::ca::CaMaterial;
pub use crate::config::Config;
