use std::net::IpAddr;
use base64::Engine;
use tracing::debug;
use x509_parser::certification_request::X509CertificationRequest;
use x509_parser::asn1_rs::Tag;
use x509_parser::extensions::{GeneralName, ParsedExtension};
use x509_parser::oid_registry::asn1_rs::oid;
use x509_parser::prelude::FromDer;
use x509_parser::x509::{AlgorithmIdentifier, X509Name};

use crate::acme::envelope::BASE64URL;
use crate::ca::types::{KeyAlgorithm, NameAttribute, NameValueKind, SubjectPublicKey};
use crate::error::Error;
use crate::types::Result;

/// Decoded PKCS#10 certificate signing request
///
/// Only the parts copied into an issued certificate are kept. The request's
/// own signature is not checked: finalize accepts any structurally valid CSR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateRequest {
    /// Subject distinguished name
    pub subject: Vec<NameAttribute>,
    /// Requested DNS names
    pub dns_names: Vec<String>,
    /// Requested e-mail addresses
    pub email_addresses: Vec<String>,
    /// Requested IP addresses
    pub ip_addresses: Vec<IpAddr>,
    /// Subject public key
    pub public_key: SubjectPublicKey,
}

impl CertificateRequest {
    /// Decode the base64url `csr` field of a finalize message
    pub fn from_base64url(encoded: &str) -> Result<Self> {
        let der = BASE64URL.decode(encoded.trim())?;
        Self::from_der(&der)
    }

    /// Parse a DER-encoded PKCS#10 request
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let (_, csr) = X509CertificationRequest::from_der(der)
            .map_err(|e| Error::InvalidCsr(format!("failed to parse CSR: {}", e)))?;

        let info = &csr.certification_request_info;
        let subject = name_attributes(&info.subject)?;

        let algorithm = detect_algorithm(&info.subject_pki.algorithm).ok_or_else(|| {
            Error::InvalidCsr("unsupported public key algorithm".to_string())
        })?;
        let public_key = SubjectPublicKey {
            algorithm,
            key_bytes: info.subject_pki.subject_public_key.data.to_vec(),
        };

        let mut request = Self {
            subject,
            dns_names: Vec::new(),
            email_addresses: Vec::new(),
            ip_addresses: Vec::new(),
            public_key,
        };

        if let Some(extensions) = csr.requested_extensions() {
            for ext in extensions {
                if let ParsedExtension::SubjectAlternativeName(san) = ext {
                    for name in &san.general_names {
                        request.push_general_name(name)?;
                    }
                }
            }
        }

        debug!(
            "Parsed CSR: {} subject attributes, {} DNS names, {} e-mail addresses, {} IP addresses, {} key",
            request.subject.len(),
            request.dns_names.len(),
            request.email_addresses.len(),
            request.ip_addresses.len(),
            request.public_key.algorithm.as_str(),
        );
        Ok(request)
    }

    /// Common name of the subject, if any
    pub fn common_name(&self) -> Option<&str> {
        self.subject
            .iter()
            .find(|attr| attr.oid == [2, 5, 4, 3])
            .map(|attr| attr.value.as_str())
    }

    fn push_general_name(&mut self, name: &GeneralName<'_>) -> Result<()> {
        match name {
            GeneralName::DNSName(dns) => self.dns_names.push(dns.to_string()),
            GeneralName::RFC822Name(email) => self.email_addresses.push(email.to_string()),
            GeneralName::IPAddress(bytes) => self.ip_addresses.push(parse_ip(bytes)?),
            // URIs and other name forms are not carried into issued certificates
            _ => {}
        }
        Ok(())
    }
}

/// Copy the subject in RDN order
///
/// Issued subjects are rebuilt attribute by attribute, which cannot express a
/// repeated attribute type or a multi-valued RDN. Such subjects are refused
/// rather than truncated.
fn name_attributes(name: &X509Name<'_>) -> Result<Vec<NameAttribute>> {
    let mut attributes: Vec<NameAttribute> = Vec::new();
    for rdn in name.iter() {
        if rdn.iter().count() != 1 {
            return Err(Error::InvalidCsr(
                "multi-valued subject RDNs are not supported".to_string(),
            ));
        }
        for attr in rdn.iter() {
            let oid: Vec<u64> = attr
                .attr_type()
                .iter()
                .ok_or_else(|| Error::InvalidCsr("subject attribute OID too large".to_string()))?
                .collect();
            if attributes.iter().any(|seen| seen.oid == oid) {
                return Err(Error::InvalidCsr(format!(
                    "subject repeats attribute {}",
                    attr.attr_type()
                )));
            }

            let kind = match attr.attr_value().tag() {
                Tag::PrintableString => NameValueKind::Printable,
                Tag::Ia5String => NameValueKind::Ia5,
                Tag::Utf8String => NameValueKind::Utf8,
                other => {
                    return Err(Error::InvalidCsr(format!(
                        "unsupported string type {} in subject attribute {}",
                        other,
                        attr.attr_type()
                    )))
                }
            };
            let value = attr
                .as_str()
                .map_err(|e| Error::InvalidCsr(format!("unreadable subject attribute: {}", e)))?;
            attributes.push(NameAttribute {
                oid,
                kind,
                value: value.to_string(),
            });
        }
    }
    Ok(attributes)
}

fn parse_ip(bytes: &[u8]) -> Result<IpAddr> {
    match bytes.len() {
        4 => {
            let octets: [u8; 4] = bytes.try_into().map_err(|_| bad_ip())?;
            Ok(IpAddr::from(octets))
        }
        16 => {
            let octets: [u8; 16] = bytes.try_into().map_err(|_| bad_ip())?;
            Ok(IpAddr::from(octets))
        }
        _ => Err(bad_ip()),
    }
}

fn bad_ip() -> Error {
    Error::InvalidCsr("malformed IP address in subject alternative name".to_string())
}

/// Map the request's public key algorithm identifier to a supported algorithm
fn detect_algorithm(alg: &AlgorithmIdentifier<'_>) -> Option<KeyAlgorithm> {
    let rsa_oid = oid!(1.2.840 .113549 .1 .1 .1);
    let ec_oid = oid!(1.2.840 .10045 .2 .1);
    let ed25519_oid = oid!(1.3.101 .112);
    let secp256r1_oid = oid!(1.2.840 .10045 .3 .1 .7);
    let secp384r1_oid = oid!(1.3.132 .0 .34);

    if alg.algorithm == rsa_oid {
        return Some(KeyAlgorithm::Rsa);
    }

    if alg.algorithm == ed25519_oid {
        return Some(KeyAlgorithm::Ed25519);
    }

    if alg.algorithm == ec_oid {
        let curve = alg.parameters.as_ref()?.as_oid().ok()?;
        if curve == secp256r1_oid {
            return Some(KeyAlgorithm::EcdsaP256);
        }
        if curve == secp384r1_oid {
            return Some(KeyAlgorithm::EcdsaP384);
        }
    }

    None
}
