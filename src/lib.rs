//! A proof-of-work ledger node: hash-linked blocks, a pending pool, and
//! longest-valid-chain reconciliation with peers over HTTP.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod consensus;
pub mod error;
pub mod transaction;
