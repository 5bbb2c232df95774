//! Daily trading journal core - domain models, services and traits.
//!
//! This crate holds the day-record store, the `date,pnl` ledger merge, the
//! screenshot codec and dashboard aggregates. It is storage-agnostic: the
//! key-value persistence it needs is defined by [`kv::KeyValueStoreTrait`] and
//! implemented by the `storage-sqlite` crate.

pub mod codec;
pub mod constants;
pub mod errors;
pub mod journal;
pub mod kv;
pub mod ledger;
pub mod stats;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
