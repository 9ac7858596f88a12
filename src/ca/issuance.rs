use std::sync::Arc;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

#[cfg(test)]
use mockall::automock;

use crate::ca::csr::CertificateRequest;
use crate::ca::types::{CertificateTemplate, IssuedCertificate, SerialNumber};
use crate::error::Error;
use crate::types::Result;

/// Backdating applied to `NotBefore` to absorb client clock skew
const NOT_BEFORE_BACKDATE_DAYS: i64 = 1;

/// Upper bound accepted for the configured validity period
pub const MAX_VALIDITY_DAYS: u32 = 36_525;

/// Signs certificate templates on behalf of the CA
#[cfg_attr(test, automock)]
pub trait CertificateSigner: Send + Sync {
    /// Produce the DER encoding of a certificate built from `template`
    fn sign(&self, template: &CertificateTemplate) -> Result<Vec<u8>>;
}

/// Turns decoded certificate requests into signed certificates
#[derive(Clone)]
pub struct IssuancePipeline {
    /// CA signer
    signer: Arc<dyn CertificateSigner>,
    /// Validity of issued certificates in days
    validity_days: u32,
}

impl IssuancePipeline {
    pub fn new(signer: Arc<dyn CertificateSigner>, validity_days: u32) -> Self {
        Self {
            signer,
            validity_days,
        }
    }

    pub fn validity_days(&self) -> u32 {
        self.validity_days
    }

    /// Build the template for `request` at time `now`
    pub fn template(
        &self,
        request: &CertificateRequest,
        serial: SerialNumber,
        now: OffsetDateTime,
    ) -> Result<CertificateTemplate> {
        let not_before = now
            .checked_sub(Duration::days(NOT_BEFORE_BACKDATE_DAYS))
            .ok_or_else(|| Error::Certificate("NotBefore out of range".to_string()))?;
        let not_after = now
            .checked_add(Duration::days(i64::from(self.validity_days)))
            .ok_or_else(|| {
                Error::Certificate(format!(
                    "validity of {} days runs past the last representable date",
                    self.validity_days
                ))
            })?;

        Ok(CertificateTemplate {
            serial,
            subject: request.subject.clone(),
            dns_names: request.dns_names.clone(),
            email_addresses: request.email_addresses.clone(),
            ip_addresses: request.ip_addresses.clone(),
            not_before,
            not_after,
            public_key: request.public_key.clone(),
        })
    }

    /// Issue a certificate for `request`
    pub fn issue(&self, request: &CertificateRequest) -> Result<IssuedCertificate> {
        let serial = SerialNumber::random();
        let template = self.template(request, serial, OffsetDateTime::now_utc())?;
        debug!("Signing certificate with serial {}", serial);

        let der = self.signer.sign(&template)?;

        info!(
            "Issued certificate {} for {}",
            serial,
            request.common_name().unwrap_or("<no common name>")
        );
        Ok(IssuedCertificate { der, serial })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ca::test_support;
    use x509_parser::prelude::{FromDer, X509Certificate};

    fn request(cn: &str) -> CertificateRequest {
        CertificateRequest::from_der(&test_support::csr_der(cn, &[cn])).unwrap()
    }

    #[test]
    fn test_template_validity_window() {
        let pipeline = IssuancePipeline::new(Arc::new(MockCertificateSigner::new()), 30);
        let now = OffsetDateTime::now_utc();

        let template = pipeline
            .template(&request("window.example"), SerialNumber::from_u128(7), now)
            .unwrap();

        assert_eq!(template.not_before, now - Duration::days(1));
        assert_eq!(template.not_after, now + Duration::days(30));
        assert_eq!(template.serial.value(), 7);
        assert_eq!(template.dns_names, vec!["window.example"]);
    }

    #[test]
    fn test_issue_with_ca() {
        let ca = Arc::new(test_support::test_ca());
        let pipeline = IssuancePipeline::new(ca.clone(), 90);

        let issued = pipeline.issue(&request("test.example")).unwrap();

        let (_, cert) = X509Certificate::from_der(&issued.der).unwrap();
        let (_, ca_cert) = X509Certificate::from_der(ca.certificate_der()).unwrap();

        let cn = cert.subject().iter_common_name().next().unwrap().as_str().unwrap();
        assert_eq!(cn, "test.example");
        assert_eq!(cert.issuer().to_string(), ca_cert.subject().to_string());

        let expected = OffsetDateTime::now_utc() + Duration::days(90);
        let not_after = cert.validity().not_after.timestamp();
        assert!((not_after - expected.unix_timestamp()).abs() <= 24 * 3600);

        assert_eq!(cert.tbs_certificate.serial.to_bytes_be(), issued.serial.to_be_bytes());
        assert!(issued.to_pem().starts_with("-----BEGIN CERTIFICATE-----"));
    }

    #[test]
    fn test_serials_differ_between_issuances() {
        let pipeline = IssuancePipeline::new(Arc::new(test_support::test_ca()), 90);
        let req = request("serial.example");

        let first = pipeline.issue(&req).unwrap();
        let second = pipeline.issue(&req).unwrap();
        assert_ne!(first.serial, second.serial);
    }

    #[test]
    fn test_validity_past_last_date_is_an_error() {
        let mut signer = MockCertificateSigner::new();
        signer.expect_sign().never();
        let pipeline = IssuancePipeline::new(Arc::new(signer), 4_000_000);

        let result = pipeline.issue(&request("far.example"));
        assert!(matches!(result, Err(Error::Certificate(_))));

        let pipeline = IssuancePipeline::new(Arc::new(test_support::test_ca()), MAX_VALIDITY_DAYS);
        assert!(pipeline.issue(&request("century.example")).is_ok());
    }

    #[test]
    fn test_signer_failure_propagates() {
        let mut signer = MockCertificateSigner::new();
        signer
            .expect_sign()
            .times(1)
            .returning(|_| Err(Error::Certificate("HSM offline".into())));
        let pipeline = IssuancePipeline::new(Arc::new(signer), 90);

        let result = pipeline.issue(&request("fail.example"));
        assert!(matches!(result, Err(Error::Certificate(_))));
    }
}
