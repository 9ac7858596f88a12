use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::acme::order::OrderStatus;
use crate::types::Result;

/// Deserialize a request body that must be a JSON object
///
/// Derived struct deserializers also accept arrays positionally, which no
/// protocol message allows.
pub fn from_json_object<T: DeserializeOwned>(body: &[u8]) -> Result<T> {
    let value: Value = serde_json::from_slice(body)?;
    ensure_object(&value)?;
    Ok(serde_json::from_value(value)?)
}

fn ensure_object(value: &Value) -> Result<()> {
    if value.is_object() {
        Ok(())
    } else {
        Err(serde_json::Error::custom("expected a JSON object").into())
    }
}

/// Directory of endpoint URLs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    pub new_nonce: String,
    pub new_account: String,
    pub new_order: String,
    pub revoke_cert: String,
    pub key_change: String,
}

/// Account object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub status: String,
    pub orders: String,
}

/// Identifier named in an order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// Body of a new-order request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOrderRequest {
    #[serde(default)]
    pub identifiers: Vec<Identifier>,
}

impl NewOrderRequest {
    /// Parse a new-order payload; an empty payload is an empty request
    pub fn from_json(body: &[u8]) -> Result<Self> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_slice(body)?;
        ensure_object(&value)?;
        if let Some(Value::Array(identifiers)) = value.get("identifiers") {
            identifiers.iter().try_for_each(ensure_object)?;
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Body of a finalize request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrMessage {
    /// Base64url DER certificate signing request
    pub csr: String,
}

impl CsrMessage {
    pub fn from_json(body: &[u8]) -> Result<Self> {
        from_json_object(body)
    }
}

/// Order object as seen by clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identifiers: Vec<Identifier>,
    /// Always empty, challenges are not modeled
    pub authorizations: Vec<String>,
    pub finalize: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;

    #[test]
    fn test_directory_field_names() {
        let directory = Directory {
            new_nonce: "n".into(),
            new_account: "a".into(),
            new_order: "o".into(),
            revoke_cert: "r".into(),
            key_change: "k".into(),
        };
        assert_eq!(
            serde_json::to_value(&directory).unwrap(),
            json!({"newNonce": "n", "newAccount": "a", "newOrder": "o", "revokeCert": "r", "keyChange": "k"})
        );
    }

    #[test]
    fn test_order_response_shape() {
        let order = OrderResponse {
            status: OrderStatus::Ready,
            identifiers: Vec::new(),
            authorizations: Vec::new(),
            finalize: "http://ca.test/finalize/0".into(),
            certificate: None,
        };
        assert_eq!(
            serde_json::to_value(&order).unwrap(),
            json!({"status": "ready", "authorizations": [], "finalize": "http://ca.test/finalize/0"})
        );
    }

    #[test]
    fn test_new_order_request_defaults() {
        let request: NewOrderRequest = serde_json::from_str("{}").unwrap();
        assert!(request.identifiers.is_empty());

        let request: NewOrderRequest =
            serde_json::from_str(r#"{"identifiers":[{"type":"dns","value":"test.example"}]}"#).unwrap();
        assert_eq!(request.identifiers[0].kind, "dns");
    }

    #[test]
    fn test_new_order_request_must_be_objects() {
        assert!(NewOrderRequest::from_json(b"").unwrap().identifiers.is_empty());
        assert!(NewOrderRequest::from_json(b" \n").unwrap().identifiers.is_empty());

        let request =
            NewOrderRequest::from_json(br#"{"identifiers":[{"type":"dns","value":"a.example"}]}"#)
                .unwrap();
        assert_eq!(request.identifiers[0].value, "a.example");

        let rejected: [&[u8]; 4] = [
            br#"[[]]"#,
            br#"{"identifiers":[["dns","a.example"]]}"#,
            br#""x""#,
            b"null",
        ];
        for body in rejected {
            let result = NewOrderRequest::from_json(body);
            assert!(matches!(result, Err(Error::Json(_))), "{:?}", String::from_utf8_lossy(body));
        }
    }

    #[test]
    fn test_csr_message_must_be_object() {
        assert_eq!(CsrMessage::from_json(br#"{"csr":"MIIB"}"#).unwrap().csr, "MIIB");
        assert!(matches!(CsrMessage::from_json(br#"["MIIB"]"#), Err(Error::Json(_))));
    }
}
