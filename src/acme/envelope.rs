use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::acme::types::from_json_object;
use crate::types::Result;

/// URL-safe base64 that emits no padding and accepts input with or without it
pub const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// JWS-style request wrapper
///
/// Only the framing is honoured. `protected` and `signature` are carried
/// along but never verified, so any client can submit any payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Base64url protected header
    #[serde(default)]
    pub protected: String,
    /// Base64url payload; absent means empty
    #[serde(default)]
    pub payload: String,
    /// Base64url signature
    #[serde(default)]
    pub signature: String,
}

impl Envelope {
    pub fn parse(body: &[u8]) -> Result<Self> {
        from_json_object(body)
    }

    /// Decoded payload bytes
    pub fn payload_bytes(&self) -> Result<Vec<u8>> {
        Ok(BASE64URL.decode(self.payload.trim())?)
    }

    /// Parse an envelope and return its decoded payload
    pub fn unwrap_payload(body: &[u8]) -> Result<Vec<u8>> {
        Self::parse(body)?.payload_bytes()
    }
}
