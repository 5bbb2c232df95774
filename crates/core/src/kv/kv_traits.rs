use async_trait::async_trait;

use crate::errors::Result;

/// Repository trait for the local key-value store.
///
/// Values are opaque strings. A single `set_item` replaces the whole value and is
/// atomic: after a failure the previous value is still the one visible.
#[async_trait]
pub trait KeyValueStoreTrait: Send + Sync {
    /// Get the value stored under `key`, `None` when absent.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Remove every listed key. Missing keys are ignored.
    async fn remove_items(&self, keys: &[&str]) -> Result<()>;
}
