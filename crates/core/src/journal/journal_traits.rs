use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::Result;
use crate::journal::journal_model::{
    CsvBaseline, CsvExport, DayRecord, DayRecordPatch, StorageUsage,
};

/// Trait for the day-record store.
///
/// Reads never fail: an absent or corrupt blob reads as empty. Writes replace the
/// whole persisted collection in one store write and surface persistence errors.
#[async_trait]
pub trait JournalServiceTrait: Send + Sync {
    /// Every persisted record, in storage order.
    fn load_all(&self) -> Vec<DayRecord>;

    /// Replaces the entire persisted collection.
    async fn save_all(&self, records: Vec<DayRecord>) -> Result<()>;

    fn find_by_date(&self, date: NaiveDate) -> Option<DayRecord>;

    /// Insert-or-update keyed by date. Keeps `id`/`createdAt` of an existing
    /// record, refreshes `updatedAt`, persists the collection sorted by date.
    async fn upsert(&self, patch: DayRecordPatch) -> Result<DayRecord>;

    /// Removes the record for `date`; no-op when there is none.
    async fn delete_by_date(&self, date: NaiveDate) -> Result<()>;

    fn load_csv_baseline(&self) -> Option<CsvBaseline>;

    async fn save_csv_baseline(&self, baseline: CsvBaseline) -> Result<()>;

    /// Decodes an uploaded ledger file and stores it as the baseline.
    async fn import_csv_baseline(&self, name: &str, bytes: &[u8]) -> Result<CsvBaseline>;

    /// Baseline with the stored value of `date` merged in.
    fn export_day(&self, date: NaiveDate) -> Result<CsvExport>;

    /// Baseline with every stored day merged in.
    fn export_all(&self) -> Result<CsvExport>;

    fn storage_usage(&self) -> StorageUsage;

    /// Erases day records, the baseline and the legacy trade collection.
    async fn clear_all(&self) -> Result<()>;
}
