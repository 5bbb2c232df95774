use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use std::sync::Arc;
use uuid::Uuid;

use super::journal_model::{
    parse_csv_baseline, parse_day_records, CsvBaseline, CsvExport, DayRecord, DayRecordPatch,
    LoadOutcome, StorageUsage,
};
use super::JournalServiceTrait;
use crate::codec::{estimate_encoded_size, read_as_text};
use crate::constants::{
    CSV_BASELINE_KEY, DAY_RECORDS_KEY, DEFAULT_EXPORT_BASE_NAME, LEGACY_TRADES_KEY,
    SCREENSHOT_WARN_BYTES,
};
use crate::errors::{Result, ValidationError};
use crate::kv::KeyValueStoreTrait;
use crate::ledger::{build_export_file_name, merge_daily_value, Ledger};
use crate::utils::time_utils::{format_journal_date, now_millis};

pub struct JournalService {
    store: Arc<dyn KeyValueStoreTrait>,
}

impl JournalService {
    pub fn new(store: Arc<dyn KeyValueStoreTrait>) -> Self {
        JournalService { store }
    }

    /// Reads the day-record blob, keeping the reason when it is unusable.
    pub fn load_outcome(&self) -> LoadOutcome {
        match self.store.get_item(DAY_RECORDS_KEY) {
            Ok(raw) => parse_day_records(raw.as_deref()),
            Err(e) => LoadOutcome::Corrupt(e.to_string()),
        }
    }

    fn read_baseline_raw(&self) -> Option<String> {
        match self.store.get_item(CSV_BASELINE_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to read CSV baseline: {}", e);
                None
            }
        }
    }

    fn export_base(&self) -> (String, String) {
        match self.load_csv_baseline() {
            Some(baseline) => (baseline.name, baseline.text),
            None => (DEFAULT_EXPORT_BASE_NAME.to_string(), String::new()),
        }
    }
}

fn warn_large_screenshots(record: &DayRecord) {
    for (index, shot) in record.screenshots.iter().enumerate() {
        let bytes = estimate_encoded_size(shot);
        if bytes > SCREENSHOT_WARN_BYTES {
            warn!(
                "Screenshot {} of {} is large: ~{} bytes",
                index + 1,
                record.date,
                bytes
            );
        }
    }
}

#[async_trait]
impl JournalServiceTrait for JournalService {
    fn load_all(&self) -> Vec<DayRecord> {
        match self.load_outcome() {
            LoadOutcome::Loaded { records, skipped } => {
                if skipped > 0 {
                    warn!("Skipped {} unreadable day records", skipped);
                }
                records
            }
            LoadOutcome::Missing => Vec::new(),
            LoadOutcome::Corrupt(reason) => {
                warn!("Day records unreadable, starting empty: {}", reason);
                Vec::new()
            }
        }
    }

    async fn save_all(&self, records: Vec<DayRecord>) -> Result<()> {
        let payload = serde_json::to_string(&records)?;
        debug!(
            "Saving {} day records ({} bytes)",
            records.len(),
            payload.len()
        );
        self.store
            .set_item(DAY_RECORDS_KEY, &payload)
            .await
            .inspect_err(|e| error!("Failed to save day records: {}", e))
    }

    fn find_by_date(&self, date: NaiveDate) -> Option<DayRecord> {
        self.load_all().into_iter().find(|r| r.date == date)
    }

    async fn upsert(&self, patch: DayRecordPatch) -> Result<DayRecord> {
        let mut records = self.load_all();
        let now = now_millis();

        // one record per date: later duplicates of the patched date are dropped
        let before = records.len();
        let mut seen = false;
        records.retain(|r| {
            if r.date != patch.date {
                return true;
            }
            !std::mem::replace(&mut seen, true)
        });
        if records.len() != before {
            warn!(
                "Dropped {} duplicate day records for {}",
                before - records.len(),
                patch.date
            );
        }

        let record = match records.iter_mut().find(|r| r.date == patch.date) {
            Some(existing) => {
                existing.pnl = patch.pnl;
                existing.memo = patch.memo;
                existing.screenshots = patch.screenshots;
                existing.updated_at = now;
                existing.clone()
            }
            None => {
                let created = DayRecord {
                    id: Uuid::new_v4().to_string(),
                    date: patch.date,
                    pnl: patch.pnl,
                    memo: patch.memo,
                    screenshots: patch.screenshots,
                    created_at: now,
                    updated_at: now,
                };
                records.push(created.clone());
                created
            }
        };

        warn_large_screenshots(&record);
        records.sort_by(|a, b| a.date.cmp(&b.date));
        self.save_all(records).await?;
        debug!("Upserted day record {} ({})", record.date, record.id);
        Ok(record)
    }

    async fn delete_by_date(&self, date: NaiveDate) -> Result<()> {
        let mut records = self.load_all();
        let before = records.len();
        records.retain(|r| r.date != date);
        if records.len() == before {
            debug!("No day record for {}, nothing to delete", date);
            return Ok(());
        }
        self.save_all(records).await
    }

    fn load_csv_baseline(&self) -> Option<CsvBaseline> {
        parse_csv_baseline(self.read_baseline_raw().as_deref())
    }

    async fn save_csv_baseline(&self, baseline: CsvBaseline) -> Result<()> {
        let payload = serde_json::to_string(&baseline)?;
        self.store.set_item(CSV_BASELINE_KEY, &payload).await
    }

    async fn import_csv_baseline(&self, name: &str, bytes: &[u8]) -> Result<CsvBaseline> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        let text = read_as_text(bytes)?;
        let rows = Ledger::parse(&text).len();
        let baseline = CsvBaseline {
            name: name.to_string(),
            text,
            updated_at: now_millis(),
        };
        self.save_csv_baseline(baseline.clone()).await?;
        debug!("Imported CSV baseline '{}' with {} rows", baseline.name, rows);
        Ok(baseline)
    }

    fn export_day(&self, date: NaiveDate) -> Result<CsvExport> {
        let record = self.find_by_date(date).ok_or_else(|| {
            ValidationError::InvalidInput(format!(
                "no journal entry for {}",
                format_journal_date(date)
            ))
        })?;
        let (name, text) = self.export_base();
        Ok(CsvExport {
            file_name: build_export_file_name(&name),
            text: merge_daily_value(&text, record.date, record.pnl),
        })
    }

    fn export_all(&self) -> Result<CsvExport> {
        let (name, base_text) = self.export_base();
        let mut ledger = Ledger::parse(&base_text);
        for record in self.load_all() {
            ledger.set(record.date, record.pnl);
        }
        Ok(CsvExport {
            file_name: build_export_file_name(&name),
            text: ledger.render(),
        })
    }

    fn storage_usage(&self) -> StorageUsage {
        let records = self.load_all();
        let screenshots = records.iter().flat_map(|r| r.screenshots.iter());
        StorageUsage {
            record_count: records.len(),
            screenshot_count: screenshots.clone().count(),
            approx_screenshot_bytes: screenshots.map(|s| estimate_encoded_size(s)).sum(),
            baseline_bytes: self.read_baseline_raw().map(|r| r.len()).unwrap_or(0),
        }
    }

    async fn clear_all(&self) -> Result<()> {
        self.store
            .remove_items(&[DAY_RECORDS_KEY, CSV_BASELINE_KEY, LEGACY_TRADES_KEY])
            .await?;
        info!("Cleared all journal data");
        Ok(())
    }
}
