use std::io;
use std::path::Path;
use std::sync::Arc;
use rustls::{Certificate, PrivateKey, ServerConfig};
use rustls_pemfile::{certs, ec_private_keys, pkcs8_private_keys, rsa_private_keys};
use tokio::fs;
use tracing::debug;

use crate::error::Error;

/// TLS utilities for the HTTPS listener
pub struct TlsUtils;

impl TlsUtils {
    /// Load certificates from a PEM string
    pub fn load_certificates(cert_pem: &str) -> Result<Vec<Certificate>, Error> {
        let mut cert_reader = io::BufReader::new(cert_pem.as_bytes());
        let certs: Vec<Certificate> = certs(&mut cert_reader)
            .map_err(|e| Error::Tls(format!("Failed to load certificates: {}", e)))?
            .into_iter()
            .map(Certificate)
            .collect();

        if certs.is_empty() {
            return Err(Error::Tls("No certificate found".into()));
        }

        Ok(certs)
    }

    /// Load a private key from a PEM string
    ///
    /// PKCS#8 is tried first, then PKCS#1 RSA, then SEC1 EC keys.
    pub fn load_private_key(key_pem: &str) -> Result<PrivateKey, Error> {
        let readers: [fn(&mut dyn io::BufRead) -> io::Result<Vec<Vec<u8>>>; 3] =
            [pkcs8_private_keys, rsa_private_keys, ec_private_keys];

        for read_keys in readers {
            let mut key_reader = io::BufReader::new(key_pem.as_bytes());
            let mut keys = read_keys(&mut key_reader)
                .map_err(|e| Error::Tls(format!("Failed to load private key: {}", e)))?;
            if !keys.is_empty() {
                return Ok(PrivateKey(keys.remove(0)));
            }
        }

        Err(Error::Tls("No private key found".into()))
    }

    /// Load certificates from a file
    pub async fn load_certificates_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Certificate>, Error> {
        let cert_pem = fs::read_to_string(path).await?;
        Self::load_certificates(&cert_pem)
    }

    /// Load a private key from a file
    pub async fn load_private_key_from_file<P: AsRef<Path>>(path: P) -> Result<PrivateKey, Error> {
        let key_pem = fs::read_to_string(path).await?;
        Self::load_private_key(&key_pem)
    }

    /// Server configuration without client authentication
    pub fn server_config(certs: Vec<Certificate>, key: PrivateKey) -> Result<Arc<ServerConfig>, Error> {
        debug!("Building TLS server config with {} certificate(s)", certs.len());
        let server_config = ServerConfig::builder()
            .with_safe_defaults()
            .with_no_client_auth()
            .with_single_cert(certs, key)
            .map_err(|e| Error::Tls(format!("Failed to set certificate: {}", e)))?;

        Ok(Arc::new(server_config))
    }
}
