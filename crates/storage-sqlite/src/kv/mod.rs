//! SQLite storage implementation for the journal's key-value blobs.

mod model;
mod repository;

pub use model::KvItemDB;
pub use repository::KeyValueRepository;

// Re-export trait from core for convenience
pub use dtjournal_core::kv::KeyValueStoreTrait;
