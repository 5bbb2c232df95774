//! Ledger module - CSV baseline reconciliation and export naming.

mod ledger_merge;

pub use ledger_merge::{build_export_file_name, merge_daily_value, Ledger};
