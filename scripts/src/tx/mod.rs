//! RPC client and transaction helpers.

pub mod client;
pub mod sender;
