//! Database model for key-value items.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// One stored blob, keyed by its storage key.
#[derive(Queryable, Insertable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::kv_store)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct KvItemDB {
    pub item_key: String,
    pub item_value: String,
    /// RFC 3339 timestamp of the last write
    pub updated_at: String,
}
