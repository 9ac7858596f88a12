use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::acme::types::Identifier;
use crate::error::Error;
use crate::types::Result;

/// Position of an order in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub usize);

impl FromStr for OrderId {
    type Err = Error;

    /// Base-10, non-negative, no sign or whitespace
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::NotFound(format!("order {}", s)));
        }
        s.parse::<usize>()
            .map(OrderId)
            .map_err(|_| Error::NotFound(format!("order {}", s)))
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Order lifecycle; there is no `invalid` state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Ready,
    Valid,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Ready => "ready",
            OrderStatus::Valid => "valid",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One certificate issuance request, from creation through finalize
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// Assigned by the registry on insert
    pub id: OrderId,
    pub status: OrderStatus,
    /// Identifiers named at creation
    pub identifiers: Vec<Identifier>,
    /// Issued certificate, set by the one successful finalize
    pub certificate_der: Option<Vec<u8>>,
}

impl Order {
    pub fn new(identifiers: Vec<Identifier>) -> Self {
        Self {
            id: OrderId(0),
            status: OrderStatus::Pending,
            identifiers,
            certificate_der: None,
        }
    }

    /// Advance `pending -> ready`
    ///
    /// Stands in for the authorization phase: no challenge is issued or
    /// checked, every order is treated as authorized.
    pub fn authorize(&mut self) {
        if self.status == OrderStatus::Pending {
            self.status = OrderStatus::Ready;
        }
    }

    /// Attach the issued certificate, `ready -> valid`
    pub fn complete(&mut self, certificate_der: Vec<u8>) -> Result<()> {
        if self.status != OrderStatus::Ready {
            return Err(Error::InvalidRequest(format!(
                "order {} is {}, not ready",
                self.id, self.status
            )));
        }
        self.certificate_der = Some(certificate_der);
        self.status = OrderStatus::Valid;
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.status == OrderStatus::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_parsing() {
        assert_eq!("0".parse::<OrderId>().unwrap(), OrderId(0));
        assert_eq!("42".parse::<OrderId>().unwrap(), OrderId(42));

        for bad in ["", "-1", "+1", "abc", "1.5", " 1", "99999999999999999999999999"] {
            assert!(
                matches!(bad.parse::<OrderId>(), Err(Error::NotFound(_))),
                "{:?} should not parse",
                bad
            );
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut order = Order::new(Vec::new());
        assert_eq!(order.status, OrderStatus::Pending);

        order.authorize();
        assert_eq!(order.status, OrderStatus::Ready);

        order.complete(vec![1, 2, 3]).unwrap();
        assert!(order.is_valid());
        assert_eq!(order.certificate_der.as_deref(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_complete_only_once() {
        let mut order = Order::new(Vec::new());
        assert!(order.complete(vec![1]).is_err());

        order.authorize();
        order.complete(vec![1]).unwrap();
        assert!(order.complete(vec![2]).is_err());
        assert_eq!(order.certificate_der, Some(vec![1]));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&OrderStatus::Ready).unwrap(), "\"ready\"");
        assert_eq!(OrderStatus::Valid.to_string(), "valid");
    }
}
