//! SQLite storage implementation for the trading journal.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the key-value trait defined in `dtjournal-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The quota-aware key-value repository
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!        core (journal, ledger, stats)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod kv;
pub mod schema;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use kv::KeyValueRepository;

// Re-export from dtjournal-core for convenience
pub use dtjournal_core::errors::{DatabaseError, Error, Result};
