pub mod tls;

// Re-export key types
pub use tls::TlsUtils;
