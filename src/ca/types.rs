use std::fmt;
use std::net::IpAddr;
use rand::rngs::OsRng;
use rand::Rng;
use time::OffsetDateTime;

/// Certificate serial number, uniform over `[0, 2^128)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SerialNumber(u128);

impl SerialNumber {
    /// Draw a fresh serial from the OS random source
    pub fn random() -> Self {
        Self(OsRng.gen::<u128>())
    }

    pub fn from_u128(value: u128) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u128 {
        self.0
    }

    /// Minimal big-endian encoding (at least one byte)
    pub fn to_be_bytes(&self) -> Vec<u8> {
        let bytes = self.0.to_be_bytes();
        let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
        bytes[first..].to_vec()
    }
}

impl fmt::Display for SerialNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:x}", self.0)
    }
}

/// Public key algorithms accepted in certificate requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAlgorithm {
    /// RSA (rsaEncryption)
    Rsa,
    /// ECDSA on NIST P-256
    EcdsaP256,
    /// ECDSA on NIST P-384
    EcdsaP384,
    /// Ed25519
    Ed25519,
}

impl KeyAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyAlgorithm::Rsa => "RSA",
            KeyAlgorithm::EcdsaP256 => "ECDSA-P256",
            KeyAlgorithm::EcdsaP384 => "ECDSA-P384",
            KeyAlgorithm::Ed25519 => "Ed25519",
        }
    }
}

/// Subject public key copied out of a certificate request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPublicKey {
    /// Key algorithm
    pub algorithm: KeyAlgorithm,
    /// Contents of the subjectPublicKey BIT STRING
    pub key_bytes: Vec<u8>,
}

/// ASN.1 string type a subject attribute value was encoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameValueKind {
    Printable,
    Ia5,
    Utf8,
}

/// One subject attribute: dotted OID arcs, string type and value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameAttribute {
    pub oid: Vec<u64>,
    pub kind: NameValueKind,
    pub value: String,
}

/// Everything the signer needs to produce a certificate
#[derive(Debug, Clone)]
pub struct CertificateTemplate {
    /// Serial number
    pub serial: SerialNumber,
    /// Subject distinguished name, in request order
    pub subject: Vec<NameAttribute>,
    /// DNS names
    pub dns_names: Vec<String>,
    /// E-mail addresses
    pub email_addresses: Vec<String>,
    /// IP addresses
    pub ip_addresses: Vec<IpAddr>,
    /// Start of validity
    pub not_before: OffsetDateTime,
    /// End of validity
    pub not_after: OffsetDateTime,
    /// Subject public key
    pub public_key: SubjectPublicKey,
}

/// A signed certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedCertificate {
    /// DER encoding
    pub der: Vec<u8>,
    /// Serial number
    pub serial: SerialNumber,
}

impl IssuedCertificate {
    /// PEM `CERTIFICATE` block
    pub fn to_pem(&self) -> String {
        encode_certificate_pem(&self.der)
    }
}

/// Wrap DER bytes in a PEM `CERTIFICATE` block
pub fn encode_certificate_pem(der: &[u8]) -> String {
    let config = pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF);
    pem::encode_config(&pem::Pem::new("CERTIFICATE", der.to_vec()), config)
}
