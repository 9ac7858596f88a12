use anyhow::{Context, Result};
use acme_ca::{
    api::{ApiServer, ApiState},
    ca::CaMaterial,
    config::Config,
    crypto::TlsUtils,
    telemetry, AcmeService,
};
use rustls::{Certificate, PrivateKey};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Environment and configuration
    dotenvy::dotenv().ok();
    let config = Config::load().context("Failed to load configuration")?;

    // 2. Initialize telemetry
    telemetry::init_logging(&config.telemetry).context("Failed to initialize logging")?;
    info!("Starting ACME CA...");

    config.validate().context("Invalid configuration")?;

    // 3. Load CA material once, before accepting traffic
    let ca = Arc::new(
        CaMaterial::load(
            &config.ca.cert_path,
            &config.ca.key_path,
            config.ca.passphrase.as_deref(),
        )
        .context("Failed to load CA material")?,
    );

    // 4. Optional TLS listener, falling back to the CA certificate and key
    let tls = if config.server.tls.enabled {
        let certs = match &config.server.tls.cert_path {
            Some(path) => TlsUtils::load_certificates_from_file(path)
                .await
                .context("Failed to load TLS certificate")?,
            None => vec![Certificate(ca.certificate_der().to_vec())],
        };
        let key = match &config.server.tls.key_path {
            Some(path) => TlsUtils::load_private_key_from_file(path)
                .await
                .context("Failed to load TLS private key")?,
            None => PrivateKey(ca.signing_key_der().to_vec()),
        };
        Some(TlsUtils::server_config(certs, key).context("Failed to build TLS configuration")?)
    } else {
        None
    };

    // 5. Service and API server
    let service = Arc::new(AcmeService::new(ca, config.ca.validity_days));
    let state = ApiState::new(service, config.scheme());
    let server = ApiServer::new(&config, state, tls).context("Failed to create API server")?;

    info!(
        "ACME CA listening on {}://{}",
        config.scheme(),
        server.address()
    );
    server.start_with_shutdown().await?;

    info!("ACME CA stopped");
    Ok(())
}
