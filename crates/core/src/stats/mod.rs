//! Read-only aggregates over day records: totals, equity curve and calendar tones.

mod stats_calculator;
pub mod stats_model;


pub use stats_calculator::{build_equity_series, sum_pnl, summarize, tones_for_month};
pub use stats_model::*;
