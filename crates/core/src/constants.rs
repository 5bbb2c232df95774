/// Storage key holding the JSON array of day records
pub const DAY_RECORDS_KEY: &str = "dtj_days_v1";

/// Storage key holding the uploaded CSV baseline
pub const CSV_BASELINE_KEY: &str = "dtj_csv_base_v1";

/// Storage key of the per-trade collection written by the first schema.
/// Never migrated, only removed by a full reset.
pub const LEGACY_TRADES_KEY: &str = "dtj_trades_v3";

/// Largest accepted absolute PnL for one day. Keeps every running total in `i64`.
pub const MAX_ABS_PNL: i64 = 1_000_000_000_000_000;

/// Default capacity budget for the key-value store, in bytes
pub const DEFAULT_STORAGE_QUOTA_BYTES: u64 = 5 * 1024 * 1024;

/// Screenshots larger than this (estimated) trigger a soft warning
pub const SCREENSHOT_WARN_BYTES: usize = 1200 * 1024;

/// Default bounding box for pasted screenshots
pub const DEFAULT_IMAGE_MAX_WIDTH: u32 = 1100;
pub const DEFAULT_IMAGE_MAX_HEIGHT: u32 = 1100;

/// Bounding box used by the day-detail entry point
pub const DETAIL_IMAGE_MAX_WIDTH: u32 = 1300;
pub const DETAIL_IMAGE_MAX_HEIGHT: u32 = 1300;

/// Default JPEG quality, on the 0..1 scale
pub const DEFAULT_IMAGE_QUALITY: f32 = 0.82;

/// Ledger header emitted when the baseline has none
pub const LEDGER_HEADER: &str = "date,pnl";

/// File name used for exports when no baseline has been uploaded
pub const DEFAULT_EXPORT_BASE_NAME: &str = "pnl.csv";

/// Date format of every persisted date
pub const DATE_FORMAT: &str = "%Y-%m-%d";
