pub mod types;
pub mod csr;
pub mod issuance;
pub mod material;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export key types
pub use types::{CertificateTemplate, IssuedCertificate, SerialNumber};
pub use csr::CertificateRequest;
pub use issuance::{CertificateSigner, IssuancePipeline};
pub use material::{load_ca_certificate, load_signing_key, CaMaterial};
