//! Journal domain models.

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::constants::MAX_ABS_PNL;
use crate::errors::ValidationError;
use crate::utils::time_utils::parse_journal_date;

/// The single persisted entry for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    pub id: String,
    pub date: NaiveDate,
    pub pnl: i64,
    pub memo: Option<String>,
    /// Inline JPEG data URLs, in display order
    pub screenshots: Vec<String>,
    /// Epoch milliseconds
    pub created_at: i64,
    pub updated_at: i64,
}

impl DayRecord {
    pub fn tone(&self) -> DayTone {
        DayTone::from_pnl(self.pnl)
    }
}

/// Sign of a day's result, used to color calendar cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayTone {
    Gain,
    Loss,
    Flat,
}

impl DayTone {
    pub fn from_pnl(pnl: i64) -> Self {
        match pnl {
            p if p > 0 => DayTone::Gain,
            p if p < 0 => DayTone::Loss,
            _ => DayTone::Flat,
        }
    }
}

/// Previously uploaded two-column ledger that daily values are merged into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvBaseline {
    pub name: String,
    pub text: String,
    pub updated_at: i64,
}

/// Date-keyed patch applied by an upsert. Replaces `pnl`, `memo` and
/// `screenshots` of the record for `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecordPatch {
    pub date: NaiveDate,
    pub pnl: i64,
    pub memo: Option<String>,
    pub screenshots: Vec<String>,
}

/// Unvalidated daily-entry form submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayEntryInput {
    pub date: Option<String>,
    pub pnl: Option<PnlInput>,
    pub memo: Option<String>,
    #[serde(default)]
    pub screenshots: Vec<String>,
}

/// PnL as typed by the user: a JSON number or the raw text of an input field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PnlInput {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl PnlInput {
    /// Resolves the input to a whole PnL amount.
    ///
    /// Text may carry surrounding whitespace, a leading `+` and `,` thousands
    /// separators. Fractions are rounded to the nearest unit. Amounts beyond
    /// [`MAX_ABS_PNL`] are rejected.
    pub fn to_pnl(&self) -> Result<i64, ValidationError> {
        let pnl = self.to_unbounded_pnl()?;
        if pnl.checked_abs().is_some_and(|abs| abs <= MAX_ABS_PNL) {
            Ok(pnl)
        } else {
            Err(ValidationError::PnlOutOfRange(pnl.to_string()))
        }
    }

    fn to_unbounded_pnl(&self) -> Result<i64, ValidationError> {
        match self {
            PnlInput::Integer(v) => Ok(*v),
            PnlInput::Float(v) => {
                float_to_pnl(*v).ok_or_else(|| ValidationError::InvalidPnl(v.to_string()))
            }
            PnlInput::Text(raw) => parse_pnl_text(raw),
        }
    }
}

fn float_to_pnl(v: f64) -> Option<i64> {
    if v.is_finite() && v.abs() < i64::MAX as f64 {
        Some(v.round() as i64)
    } else {
        None
    }
}

fn parse_pnl_text(raw: &str) -> Result<i64, ValidationError> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    let cleaned = cleaned.strip_prefix('+').unwrap_or(&cleaned);
    if cleaned.is_empty() {
        return Err(ValidationError::MissingField("pnl".to_string()));
    }
    if let Ok(v) = cleaned.parse::<i64>() {
        return Ok(v);
    }
    cleaned
        .parse::<f64>()
        .ok()
        .and_then(float_to_pnl)
        .ok_or_else(|| ValidationError::InvalidPnl(raw.to_string()))
}

impl TryFrom<DayEntryInput> for DayRecordPatch {
    type Error = ValidationError;

    fn try_from(input: DayEntryInput) -> Result<Self, Self::Error> {
        let date_text = input
            .date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ValidationError::MissingField("date".to_string()))?;
        let date = parse_journal_date(date_text)?;

        let pnl = input
            .pnl
            .as_ref()
            .ok_or_else(|| ValidationError::MissingField("pnl".to_string()))?
            .to_pnl()?;

        let memo = input
            .memo
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        Ok(DayRecordPatch {
            date,
            pnl,
            memo,
            screenshots: input.screenshots,
        })
    }
}

/// Which screenshot field a persisted record carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenshotShape {
    /// Current schema: ordered `screenshots` array
    Sequence(Vec<String>),
    /// First schema: one `shotDataUrl` string
    Legacy(String),
    Absent,
}

/// Folds either screenshot shape into the ordered sequence form.
pub fn normalize_screenshots(shape: ScreenshotShape) -> Vec<String> {
    match shape {
        ScreenshotShape::Sequence(shots) => shots,
        ScreenshotShape::Legacy(shot) => vec![shot],
        ScreenshotShape::Absent => Vec::new(),
    }
}

/// A day record as found in storage, tolerant of every shape ever written.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDayRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub date: NaiveDate,
    #[serde(deserialize_with = "lenient_pnl")]
    pub pnl: i64,
    #[serde(default)]
    pub memo: Option<String>,
    #[serde(default)]
    pub screenshots: Option<Vec<String>>,
    #[serde(default, alias = "screenshot")]
    pub shot_data_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

impl StoredDayRecord {
    /// Resolves the screenshot field once. A present array wins, even when empty.
    pub fn screenshot_shape(&self) -> ScreenshotShape {
        match (&self.screenshots, &self.shot_data_url) {
            (Some(shots), _) => ScreenshotShape::Sequence(shots.clone()),
            (None, Some(shot)) if !shot.is_empty() => ScreenshotShape::Legacy(shot.clone()),
            _ => ScreenshotShape::Absent,
        }
    }

    /// Canonical in-memory form. Records stored without an id get `fallback_id`.
    pub fn into_day_record(self, fallback_id: impl FnOnce() -> String) -> DayRecord {
        let screenshots = normalize_screenshots(self.screenshot_shape());
        let created_at = self.created_at.or(self.updated_at).unwrap_or_default();
        DayRecord {
            id: self.id.filter(|id| !id.is_empty()).unwrap_or_else(fallback_id),
            date: self.date,
            pnl: self.pnl,
            memo: self.memo,
            screenshots,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        }
    }
}

/// Accepts integers, floats (rounded) and numeric strings.
fn lenient_pnl<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;

    match PnlInput::deserialize(deserializer)? {
        PnlInput::Text(raw) if raw.trim().is_empty() => Ok(0),
        other => other.to_pnl().map_err(D::Error::custom),
    }
}

/// Result of reading the persisted day-record blob.
///
/// Corruption is a value, not an error: callers fall back to an empty collection
/// so a garbled blob from an earlier crash never locks the journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored yet
    Missing,
    /// A readable array; `skipped` counts elements that could not be parsed
    Loaded {
        records: Vec<DayRecord>,
        skipped: usize,
    },
    /// Not JSON, or not an array
    Corrupt(String),
}

impl LoadOutcome {
    pub fn into_records(self) -> Vec<DayRecord> {
        match self {
            LoadOutcome::Loaded { records, .. } => records,
            LoadOutcome::Missing | LoadOutcome::Corrupt(_) => Vec::new(),
        }
    }
}

/// Parses the stored blob into canonical records, in storage order.
pub fn parse_day_records(raw: Option<&str>) -> LoadOutcome {
    let Some(raw) = raw else {
        return LoadOutcome::Missing;
    };
    let items = match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items,
        Ok(other) => {
            return LoadOutcome::Corrupt(format!("expected an array, found {}", json_kind(&other)))
        }
        Err(e) => return LoadOutcome::Corrupt(e.to_string()),
    };

    let mut records = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for item in items {
        match serde_json::from_value::<StoredDayRecord>(item) {
            Ok(stored) => {
                let fallback = fallback_record_id(stored.date);
                records.push(stored.into_day_record(|| fallback));
            }
            Err(e) => {
                debug!("Skipping unreadable day record: {}", e);
                skipped += 1;
            }
        }
    }
    LoadOutcome::Loaded { records, skipped }
}

/// Id for a stored record that never had one. Derived from the date so every
/// read of the same blob agrees until the record is rewritten.
pub fn fallback_record_id(date: NaiveDate) -> String {
    let key = date.format("%Y-%m-%d").to_string();
    Uuid::new_v5(&Uuid::NAMESPACE_OID, key.as_bytes()).to_string()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Parses the stored CSV baseline, `None` when absent or unreadable.
pub fn parse_csv_baseline(raw: Option<&str>) -> Option<CsvBaseline> {
    let raw = raw?;
    match serde_json::from_str::<CsvBaseline>(raw) {
        Ok(baseline) => Some(baseline),
        Err(e) => {
            warn!("Ignoring unreadable CSV baseline: {}", e);
            None
        }
    }
}

/// A merged ledger ready to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvExport {
    pub file_name: String,
    pub text: String,
}

/// Rough footprint of the journal in the store, for quota budgeting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageUsage {
    pub record_count: usize,
    pub screenshot_count: usize,
    pub approx_screenshot_bytes: usize,
    pub baseline_bytes: usize,
}
