//! Unit tests for journal models and stored-blob parsing.

use crate::constants::MAX_ABS_PNL;
use crate::errors::ValidationError;
use crate::journal::journal_model::*;
use chrono::NaiveDate;

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn stored(json: &str) -> StoredDayRecord {
    serde_json::from_str(json).unwrap()
}

// --- Screenshot normalization ---

#[test]
fn test_legacy_single_screenshot_becomes_sequence() {
    let record = stored(r#"{"date":"2024-05-01","pnl":10,"shotDataUrl":"data:a"}"#);
    assert_eq!(
        record.screenshot_shape(),
        ScreenshotShape::Legacy("data:a".to_string())
    );
    assert_eq!(
        record.into_day_record(|| "gen".into()).screenshots,
        vec!["data:a".to_string()]
    );
}

#[test]
fn test_sequence_is_kept_verbatim() {
    let record = stored(
        r#"{"date":"2024-05-01","pnl":10,"screenshots":["data:b","data:a"],"shotDataUrl":"data:x"}"#,
    );
    assert_eq!(
        record.into_day_record(|| "gen".into()).screenshots,
        vec!["data:b".to_string(), "data:a".to_string()]
    );
}

#[test]
fn test_empty_sequence_wins_over_legacy() {
    let record = stored(r#"{"date":"2024-05-01","pnl":10,"screenshots":[],"screenshot":"data:x"}"#);
    assert_eq!(record.screenshot_shape(), ScreenshotShape::Sequence(vec![]));
}

#[test]
fn test_no_screenshot_field_is_empty() {
    let record = stored(r#"{"date":"2024-05-01","pnl":10}"#);
    assert_eq!(record.screenshot_shape(), ScreenshotShape::Absent);
    assert!(normalize_screenshots(record.screenshot_shape()).is_empty());
}

#[test]
fn test_normalize_is_pure() {
    assert_eq!(
        normalize_screenshots(ScreenshotShape::Legacy("x".into())),
        vec!["x".to_string()]
    );
    assert_eq!(
        normalize_screenshots(ScreenshotShape::Sequence(vec!["a".into(), "b".into()])),
        vec!["a".to_string(), "b".to_string()]
    );
    assert!(normalize_screenshots(ScreenshotShape::Absent).is_empty());
}

// --- Stored record tolerance ---

#[test]
fn test_stored_record_keeps_identity_and_timestamps() {
    let record = stored(
        r#"{"id":"abc","date":"2024-05-01","pnl":-300,"memo":"stopped out","createdAt":1,"updatedAt":2}"#,
    )
    .into_day_record(|| "gen".into());

    assert_eq!(record.id, "abc");
    assert_eq!(record.date, day("2024-05-01"));
    assert_eq!(record.pnl, -300);
    assert_eq!(record.memo.as_deref(), Some("stopped out"));
    assert_eq!((record.created_at, record.updated_at), (1, 2));
}

#[test]
fn test_missing_id_gets_fallback() {
    let record = stored(r#"{"date":"2024-05-01","pnl":0}"#).into_day_record(|| "gen".into());
    assert_eq!(record.id, "gen");
    assert_eq!((record.created_at, record.updated_at), (0, 0));
}

#[test]
fn test_lenient_pnl_forms() {
    assert_eq!(stored(r#"{"date":"2024-05-01","pnl":12.6}"#).pnl, 13);
    assert_eq!(stored(r#"{"date":"2024-05-01","pnl":"1,200"}"#).pnl, 1200);
    assert_eq!(stored(r#"{"date":"2024-05-01","pnl":""}"#).pnl, 0);
    assert!(
        serde_json::from_str::<StoredDayRecord>(r#"{"date":"2024-05-01","pnl":"abc"}"#).is_err()
    );
}

// --- Blob parsing ---

#[test]
fn test_parse_missing_blob() {
    assert_eq!(parse_day_records(None), LoadOutcome::Missing);
    assert!(parse_day_records(None).into_records().is_empty());
}

#[test]
fn test_parse_corrupt_blob() {
    assert!(matches!(
        parse_day_records(Some("{not json")),
        LoadOutcome::Corrupt(_)
    ));
    assert!(matches!(
        parse_day_records(Some(r#"{"date":"2024-05-01"}"#)),
        LoadOutcome::Corrupt(_)
    ));
    assert!(parse_day_records(Some("42")).into_records().is_empty());
}

#[test]
fn test_parse_skips_bad_elements() {
    let outcome = parse_day_records(Some(
        r#"[{"id":"a","date":"2024-05-02","pnl":5},"junk",{"id":"b","date":"not-a-date","pnl":1},{"id":"c","date":"2024-05-01","pnl":-5}]"#,
    ));
    match outcome {
        LoadOutcome::Loaded { records, skipped } => {
            assert_eq!(skipped, 2);
            // storage order, not sorted
            let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
            assert_eq!(ids, vec!["a", "c"]);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_id_less_record_keeps_its_id_across_reads() {
    let blob = r#"[{"date":"2024-05-01","pnl":5},{"date":"2024-05-02","pnl":6}]"#;
    let first = parse_day_records(Some(blob)).into_records();
    let second = parse_day_records(Some(blob)).into_records();

    assert_eq!(first[0].id, second[0].id);
    assert_eq!(first[0].id, fallback_record_id(day("2024-05-01")));
    assert_ne!(first[0].id, first[1].id);
}

#[test]
fn test_parse_skips_out_of_range_pnl() {
    let blob = format!(
        r#"[{{"id":"a","date":"2024-05-01","pnl":{}}},{{"id":"b","date":"2024-05-02","pnl":1}}]"#,
        i64::MAX
    );
    match parse_day_records(Some(&blob)) {
        LoadOutcome::Loaded { records, skipped } => {
            assert_eq!(skipped, 1);
            assert_eq!(records[0].id, "b");
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_parse_csv_baseline() {
    let baseline =
        parse_csv_baseline(Some(r#"{"name":"pnl.csv","text":"date,pnl\n","updatedAt":5}"#))
            .unwrap();
    assert_eq!(baseline.name, "pnl.csv");
    assert_eq!(baseline.updated_at, 5);
    assert!(parse_csv_baseline(Some("[]")).is_none());
    assert!(parse_csv_baseline(None).is_none());
}

#[test]
fn test_day_record_serializes_sequence_form() {
    let record = stored(r#"{"id":"a","date":"2024-05-01","pnl":1,"shotDataUrl":"data:x"}"#)
        .into_day_record(|| "gen".into());
    let json = serde_json::to_value(&record).unwrap();

    assert_eq!(json["date"], "2024-05-01");
    assert_eq!(json["screenshots"], serde_json::json!(["data:x"]));
    assert!(json.get("shotDataUrl").is_none());
    assert!(json.get("createdAt").is_some());
}

// --- Input validation ---

#[test]
fn test_entry_input_to_patch() {
    let input = DayEntryInput {
        date: Some(" 2024-05-01 ".into()),
        pnl: Some(PnlInput::Text("+1,500".into())),
        memo: Some("  ".into()),
        screenshots: vec!["data:a".into()],
    };
    let patch = DayRecordPatch::try_from(input).unwrap();

    assert_eq!(patch.date, day("2024-05-01"));
    assert_eq!(patch.pnl, 1500);
    assert_eq!(patch.memo, None);
    assert_eq!(patch.screenshots, vec!["data:a".to_string()]);
}

#[test]
fn test_entry_input_requires_date() {
    let input = DayEntryInput {
        pnl: Some(PnlInput::Integer(1)),
        ..Default::default()
    };
    assert!(matches!(
        DayRecordPatch::try_from(input),
        Err(ValidationError::MissingField(f)) if f == "date"
    ));

    let bad_date = DayEntryInput {
        date: Some("2024/05/01".into()),
        pnl: Some(PnlInput::Integer(1)),
        ..Default::default()
    };
    assert!(matches!(
        DayRecordPatch::try_from(bad_date),
        Err(ValidationError::DateParse(_))
    ));
}

#[test]
fn test_entry_input_requires_numeric_pnl() {
    let missing = DayEntryInput {
        date: Some("2024-05-01".into()),
        ..Default::default()
    };
    assert!(matches!(
        DayRecordPatch::try_from(missing),
        Err(ValidationError::MissingField(f)) if f == "pnl"
    ));

    let text = DayEntryInput {
        date: Some("2024-05-01".into()),
        pnl: Some(PnlInput::Text("ten".into())),
        ..Default::default()
    };
    assert!(matches!(
        DayRecordPatch::try_from(text),
        Err(ValidationError::InvalidPnl(_))
    ));

    let infinite = PnlInput::Float(f64::INFINITY);
    assert!(infinite.to_pnl().is_err());
}

#[test]
fn test_pnl_bounds() {
    assert_eq!(PnlInput::Integer(MAX_ABS_PNL).to_pnl().unwrap(), MAX_ABS_PNL);
    assert_eq!(PnlInput::Integer(-MAX_ABS_PNL).to_pnl().unwrap(), -MAX_ABS_PNL);
    for too_large in [
        PnlInput::Integer(MAX_ABS_PNL + 1),
        PnlInput::Integer(i64::MAX),
        PnlInput::Integer(i64::MIN),
        PnlInput::Float(1e18),
        PnlInput::Text("9,223,372,036,854,775,807".into()),
    ] {
        assert!(matches!(
            too_large.to_pnl(),
            Err(ValidationError::PnlOutOfRange(_))
        ));
    }

    let input = DayEntryInput {
        date: Some("2024-05-01".into()),
        pnl: Some(PnlInput::Integer(i64::MAX)),
        ..Default::default()
    };
    assert!(DayRecordPatch::try_from(input).is_err());
}

#[test]
fn test_pnl_input_from_json() {
    let input: DayEntryInput =
        serde_json::from_str(r#"{"date":"2024-05-01","pnl":-250}"#).unwrap();
    assert_eq!(input.pnl, Some(PnlInput::Integer(-250)));

    let input: DayEntryInput =
        serde_json::from_str(r#"{"date":"2024-05-01","pnl":"-250"}"#).unwrap();
    assert_eq!(input.pnl.unwrap().to_pnl().unwrap(), -250);
}

#[test]
fn test_day_tone() {
    assert_eq!(DayTone::from_pnl(5), DayTone::Gain);
    assert_eq!(DayTone::from_pnl(-5), DayTone::Loss);
    assert_eq!(DayTone::from_pnl(0), DayTone::Flat);
}
