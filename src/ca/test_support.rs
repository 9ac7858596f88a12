use std::net::IpAddr;
use rcgen::string::{Ia5String, PrintableString};
use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, DnValue, IsCa, KeyPair,
    KeyUsagePurpose, SanType,
};

use crate::ca::material::CaMaterial;

/// Self-signed P-256 root, returned as certificate PEM and key
pub(crate) fn ca_pem() -> (String, KeyPair) {
    let key = KeyPair::generate().unwrap();
    let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, "Test Root CA");
    dn.push(DnType::OrganizationName, "ACME CA Tests");
    params.distinguished_name = dn;
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![
        KeyUsagePurpose::KeyCertSign,
        KeyUsagePurpose::CrlSign,
        KeyUsagePurpose::DigitalSignature,
    ];
    let cert = params.self_signed(&key).unwrap();
    (cert.pem(), key)
}

pub(crate) fn test_ca() -> CaMaterial {
    let (cert_pem, key) = ca_pem();
    CaMaterial::from_pem(&cert_pem, &key.serialize_pem(), None).unwrap()
}

/// DER CSR with subject `C=US (PrintableString), CN=cn (UTF8String)`.
/// Entries of `sans` that parse as IP addresses become IP SANs, the rest
/// DNS names. Always carries `admin@test.example`.
pub(crate) fn csr_der(cn: &str, sans: &[&str]) -> Vec<u8> {
    csr_der_with_key(&KeyPair::generate().unwrap(), cn, sans)
}

/// Like [`csr_der`] with a P-384 key
pub(crate) fn p384_csr_der(cn: &str) -> Vec<u8> {
    let key = KeyPair::generate_for(&rcgen::PKCS_ECDSA_P384_SHA384).unwrap();
    csr_der_with_key(&key, cn, &[cn])
}

pub(crate) fn csr_der_with_key(key: &KeyPair, cn: &str, sans: &[&str]) -> Vec<u8> {
    let mut params = CertificateParams::new(Vec::<String>::new()).unwrap();
    let mut dn = DistinguishedName::new();
    dn.push(
        DnType::CountryName,
        DnValue::PrintableString(PrintableString::try_from("US").unwrap()),
    );
    dn.push(DnType::CommonName, cn);
    params.distinguished_name = dn;

    let mut names = Vec::new();
    for san in sans {
        match san.parse::<IpAddr>() {
            Ok(ip) => names.push(SanType::IpAddress(ip)),
            Err(_) => names.push(SanType::DnsName(Ia5String::try_from(san.to_string()).unwrap())),
        }
    }
    names.push(SanType::Rfc822Name(
        Ia5String::try_from("admin@test.example".to_string()).unwrap(),
    ));
    params.subject_alt_names = names;

    params.serialize_request(key).unwrap().der().to_vec()
}
