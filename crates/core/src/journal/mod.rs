//! Journal module - day records, the CSV baseline, and the store that owns them.

mod journal_model;
mod journal_service;
mod journal_traits;

#[cfg(test)]
mod journal_model_tests;


pub use journal_model::{
    fallback_record_id, normalize_screenshots, parse_csv_baseline, parse_day_records,
    CsvBaseline, CsvExport, DayEntryInput, DayRecord, DayRecordPatch, DayTone, LoadOutcome,
    PnlInput, ScreenshotShape, StorageUsage, StoredDayRecord,
};
pub use journal_service::JournalService;
pub use journal_traits::JournalServiceTrait;
