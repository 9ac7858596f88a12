use serde::{Deserialize, Serialize};
use std::env;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::ca::issuance::MAX_VALIDITY_DAYS;
use crate::error::Error;
use crate::types::{Result, Scheme};

/// Environment variable naming an extra configuration file
pub const CONFIG_FILE_ENV: &str = "ACMECA_CONFIG";

/// Prefix of environment variable overrides (`ACMECA__CA__VALIDITY_DAYS=30`)
pub const ENV_PREFIX: &str = "ACMECA";

/// Main configuration structure for the ACME CA
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP listener configuration
    pub server: ServerConfig,

    /// Certificate authority configuration
    pub ca: CaConfig,

    /// Telemetry configuration
    pub telemetry: TelemetryConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on; a bare port binds every interface
    pub listen_addr: String,

    /// Optional TLS listener settings
    pub tls: TlsSettings,
}

/// TLS listener settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsSettings {
    /// Serve HTTPS instead of plain HTTP
    pub enabled: bool,

    /// Server certificate; defaults to the CA certificate
    pub cert_path: Option<PathBuf>,

    /// Server private key; defaults to the CA private key
    pub key_path: Option<PathBuf>,
}

/// Certificate authority configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaConfig {
    /// CA certificate (PEM)
    pub cert_path: PathBuf,

    /// CA private key (PEM, PKCS#8, optionally encrypted)
    pub key_path: PathBuf,

    /// Passphrase of an encrypted CA private key
    pub passphrase: Option<String>,

    /// Validity of issued certificates in days
    pub validity_days: u32,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Log level (trace, debug, info, warn, error); `RUST_LOG` takes precedence
    pub log_level: String,

    /// Emit JSON log lines
    pub structured_logging: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            tls: TlsSettings::default(),
        }
    }
}

impl Default for CaConfig {
    fn default() -> Self {
        Self {
            cert_path: PathBuf::from("ca.crt"),
            key_path: PathBuf::from("ca.key"),
            passphrase: None,
            validity_days: 90,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            structured_logging: false,
        }
    }
}

impl Config {
    /// Load configuration from the default file, `ACMECA_CONFIG` and the environment
    pub fn load() -> Result<Self> {
        use config::{Config as ConfigBuilder, Environment, File};

        let mut builder = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false));

        if let Ok(config_path) = env::var(CONFIG_FILE_ENV) {
            debug!("Loading configuration from {}", config_path);
            builder = builder.add_source(File::with_name(&config_path));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let config: Config = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Load configuration from a single file, without environment overrides
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Config = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Resolve the socket address to bind
    pub fn listen_address(&self) -> Result<SocketAddr> {
        let raw = self.server.listen_addr.trim();
        let normalized = if raw.contains(':') && !raw.starts_with(':') {
            raw.to_string()
        } else {
            format!("0.0.0.0:{}", raw.trim_start_matches(':'))
        };

        normalized
            .parse()
            .map_err(|e| Error::Config(format!("Invalid listen address {}: {}", raw, e)))
    }

    /// Scheme clients reach this server under
    pub fn scheme(&self) -> Scheme {
        Scheme::for_tls(self.server.tls.enabled)
    }

    /// Validate configuration values and referenced files
    pub fn validate(&self) -> Result<()> {
        if self.ca.validity_days == 0 {
            return Err(Error::Config("Certificate validity must be at least one day".into()));
        }
        if self.ca.validity_days > MAX_VALIDITY_DAYS {
            return Err(Error::Config(format!(
                "Certificate validity must not exceed {} days",
                MAX_VALIDITY_DAYS
            )));
        }

        if !self.ca.key_path.exists() {
            return Err(Error::Config("Certificate authority private key does not exist".into()));
        }

        if !self.ca.cert_path.exists() {
            return Err(Error::Config("Certificate authority certificate does not exist".into()));
        }

        if self.server.tls.enabled {
            if let Some(key_path) = &self.server.tls.key_path {
                if !key_path.exists() {
                    return Err(Error::Config("Web server private key does not exist".into()));
                }
            }
            if let Some(cert_path) = &self.server.tls.cert_path {
                if !cert_path.exists() {
                    return Err(Error::Config("Web server certificate does not exist".into()));
                }
            }
        }

        self.listen_address()?;
        Ok(())
    }
}
