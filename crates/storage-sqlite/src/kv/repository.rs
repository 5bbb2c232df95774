use async_trait::async_trait;
use chrono::Utc;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use diesel::SqliteConnection;
use log::{debug, warn};
use std::sync::Arc;

use super::model::KvItemDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::kv_store::dsl::*;
use dtjournal_core::constants::DEFAULT_STORAGE_QUOTA_BYTES;
use dtjournal_core::errors::{DatabaseError, Error, Result};
use dtjournal_core::kv::KeyValueStoreTrait;

/// Byte footprint of stored keys plus values.
const FOOTPRINT_SQL: &str =
    "COALESCE(SUM(LENGTH(CAST(item_key AS BLOB)) + LENGTH(CAST(item_value AS BLOB))), 0)";

/// Key-value store backed by the `kv_store` table.
///
/// Every write is checked against a total byte budget, the way browser local
/// storage refuses writes past its quota. A quota of `0` disables the check.
pub struct KeyValueRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
    quota_bytes: u64,
}

impl KeyValueRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        KeyValueRepository {
            pool,
            writer,
            quota_bytes: DEFAULT_STORAGE_QUOTA_BYTES,
        }
    }

    pub fn with_quota(mut self, quota_bytes: u64) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub fn quota_bytes(&self) -> u64 {
        self.quota_bytes
    }

    /// Bytes currently used by all stored keys and values.
    pub fn used_bytes(&self) -> Result<u64> {
        let mut conn = get_connection(&self.pool)?;
        let used: i64 = kv_store
            .select(sql::<BigInt>(FOOTPRINT_SQL))
            .get_result(&mut conn)
            .into_core()?;
        Ok(used.max(0) as u64)
    }
}

/// Bytes used by every item except `key`.
fn footprint_excluding(conn: &mut SqliteConnection, key: &str) -> Result<u64> {
    let used: i64 = kv_store
        .filter(item_key.ne(key))
        .select(sql::<BigInt>(FOOTPRINT_SQL))
        .get_result(conn)
        .into_core()?;
    Ok(used.max(0) as u64)
}

#[async_trait]
impl KeyValueStoreTrait for KeyValueRepository {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        kv_store
            .find(key)
            .select(item_value)
            .first::<String>(&mut conn)
            .optional()
            .into_core()
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let item = KvItemDB {
            item_key: key.to_string(),
            item_value: value.to_string(),
            updated_at: Utc::now().to_rfc3339(),
        };
        let quota = self.quota_bytes;

        self.writer
            .exec(move |conn| {
                if quota > 0 {
                    let own = (item.item_key.len() + item.item_value.len()) as u64;
                    let required = footprint_excluding(conn, &item.item_key)? + own;
                    if required > quota {
                        warn!(
                            "Refusing write of '{}': {} bytes needed, quota {}",
                            item.item_key, required, quota
                        );
                        return Err(Error::Database(DatabaseError::QuotaExceeded {
                            required,
                            quota,
                        }));
                    }
                }

                diesel::replace_into(kv_store)
                    .values(&item)
                    .execute(conn)
                    .into_core()?;
                debug!(
                    "Stored '{}' ({} bytes)",
                    item.item_key,
                    item.item_value.len()
                );
                Ok(())
            })
            .await
    }

    async fn remove_items(&self, keys: &[&str]) -> Result<()> {
        let owned: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        self.writer
            .exec(move |conn| {
                let removed = diesel::delete(kv_store.filter(item_key.eq_any(&owned)))
                    .execute(conn)
                    .into_core()?;
                debug!("Removed {} of {} keys", removed, owned.len());
                Ok(())
            })
            .await
    }
}
