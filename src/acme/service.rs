use std::sync::Arc;
use tracing::{info, warn};

use crate::acme::order::{Order, OrderId, OrderStatus};
use crate::acme::registry::OrderRegistry;
use crate::acme::stubs::{StaticNonce, StubAccount};
use crate::acme::types::{Account, Directory, NewOrderRequest, OrderResponse};
use crate::acme::urls::BaseUrl;
use crate::acme::{
    CERTIFICATE_PREFIX, FINALIZE_PREFIX, KEY_CHANGE_PATH, NEW_ACCOUNT_PATH, NEW_NONCE_PATH,
    NEW_ORDER_PATH, ORDERS_PATH, ORDER_PREFIX, REVOKE_CERT_PATH,
};
use crate::ca::csr::CertificateRequest;
use crate::ca::issuance::{CertificateSigner, IssuancePipeline};
use crate::ca::types::encode_certificate_pem;
use crate::error::Error;
use crate::types::Result;

/// The certificate-issuance service
///
/// Owns the order registry and the issuance pipeline (and through it the
/// CA material). Handlers share one instance behind an `Arc`.
pub struct AcmeService {
    registry: OrderRegistry,
    pipeline: IssuancePipeline,
    nonce: StaticNonce,
    accounts: StubAccount,
}

impl AcmeService {
    pub fn new(signer: Arc<dyn CertificateSigner>, validity_days: u32) -> Self {
        Self::with_pipeline(IssuancePipeline::new(signer, validity_days))
    }

    pub fn with_pipeline(pipeline: IssuancePipeline) -> Self {
        Self {
            registry: OrderRegistry::new(),
            pipeline,
            nonce: StaticNonce,
            accounts: StubAccount,
        }
    }

    pub fn registry(&self) -> &OrderRegistry {
        &self.registry
    }

    /// Directory for a client that reached us at `base`
    pub fn directory(&self, base: &BaseUrl) -> Directory {
        Directory {
            new_nonce: base.join(NEW_NONCE_PATH),
            new_account: base.join(NEW_ACCOUNT_PATH),
            new_order: base.join(NEW_ORDER_PATH),
            revoke_cert: base.join(REVOKE_CERT_PATH),
            key_change: base.join(KEY_CHANGE_PATH),
        }
    }

    pub fn nonce(&self) -> &'static str {
        self.nonce.next()
    }

    pub fn new_account(&self, base: &BaseUrl) -> Account {
        self.accounts.register(base.join(ORDERS_PATH))
    }

    /// Create an order; it is authorized immediately and starts out `ready`
    pub fn new_order(&self, request: NewOrderRequest) -> Result<Order> {
        let mut order = Order::new(request.identifiers);
        order.authorize();
        let id = self.registry.create(order)?;
        info!("Created order {}", id);
        self.registry.lookup(id)
    }

    pub fn order(&self, id: OrderId) -> Result<Order> {
        self.registry.lookup(id)
    }

    /// Issue a certificate for `request` and attach it to the order
    ///
    /// A `valid` order is returned as is without signing again. On any
    /// failure the order stays `ready` and may be finalized again.
    pub fn finalize(&self, id: OrderId, request: &CertificateRequest) -> Result<Order> {
        self.registry.update(id, |order| {
            match order.status {
                OrderStatus::Valid => return Ok(order.clone()),
                OrderStatus::Ready => {}
                OrderStatus::Pending => {
                    return Err(Error::InvalidRequest(format!("order {} is not ready", id)))
                }
            }

            let issued = self.pipeline.issue(request).map_err(|e| {
                warn!("Finalize of order {} failed: {}", id, e);
                e
            })?;
            order.complete(issued.der)?;
            info!("Order {} is valid, certificate serial {}", id, issued.serial);
            Ok(order.clone())
        })
    }

    /// PEM certificate of a `valid` order
    pub fn certificate_pem(&self, id: OrderId) -> Result<String> {
        let order = self.registry.lookup(id)?;
        order
            .certificate_der
            .as_deref()
            .map(encode_certificate_pem)
            .ok_or_else(|| Error::NotFound(format!("certificate for order {}", id)))
    }

    /// Client view of `order`
    pub fn order_response(&self, order: &Order, base: &BaseUrl) -> OrderResponse {
        OrderResponse {
            status: order.status,
            identifiers: order.identifiers.clone(),
            authorizations: Vec::new(),
            finalize: Self::finalize_url(base, order.id),
            certificate: order
                .certificate_der
                .as_ref()
                .map(|_| Self::certificate_url(base, order.id)),
        }
    }

    pub fn order_url(base: &BaseUrl, id: OrderId) -> String {
        base.join(&format!("{}{}", ORDER_PREFIX, id))
    }

    pub fn finalize_url(base: &BaseUrl, id: OrderId) -> String {
        base.join(&format!("{}{}", FINALIZE_PREFIX, id))
    }

    pub fn certificate_url(base: &BaseUrl, id: OrderId) -> String {
        base.join(&format!("{}{}", CERTIFICATE_PREFIX, id))
    }
}
