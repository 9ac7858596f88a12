//! Placeholders for the parts of ACME this server does not implement.
//!
//! None of these are conformant: nonces are never tracked, accounts have no
//! identity and authorizations are never challenged.

use crate::acme::types::Account;

/// Replay nonce handed to every client
///
/// The same literal value is returned on every request and nothing checks
/// that a nonce is used once.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticNonce;

impl StaticNonce {
    pub const VALUE: &'static str = "oFvnlFP1wIhRlYS2jTaXbA";

    pub fn next(&self) -> &'static str {
        Self::VALUE
    }
}

/// Account registration that accepts every caller
///
/// No key binding or account state exists; every caller gets the same valid
/// account pointing at the shared orders URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubAccount;

impl StubAccount {
    pub fn register(&self, orders_url: String) -> Account {
        Account {
            status: "valid".to_string(),
            orders: orders_url,
        }
    }
}
