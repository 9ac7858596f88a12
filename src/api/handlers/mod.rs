pub mod account;
pub mod directory;
pub mod nonce;
pub mod order;
