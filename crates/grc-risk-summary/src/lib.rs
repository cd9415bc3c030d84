#![warn(missing_docs)]
//! # grc-risk-summary
//!
//! Headline metrics over a record snapshot: totals, elevated-risk count, and
//! mean score.
//!
//! The mean is computed in exact integer tenths and rounded half away from
//! zero, so `summarize` never depends on floating-point accumulation order.

use grc_risk_core::RiskRecord;
use serde::Serialize;

/// Summary card values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskSummary {
    /// Number of records.
    pub total: usize,
    /// Records at High or Critical.
    pub high_critical_count: usize,
    /// `total - high_critical_count`.
    pub low_medium_count: usize,
    /// Mean score rounded to one decimal place; `0.0` for an empty snapshot.
    pub average_score: f64,
}

impl RiskSummary {
    /// Renders the average with exactly one fractional digit.
    pub fn average_score_display(&self) -> String {
        format!("{:.1}", self.average_score)
    }
}

/// Computes headline metrics for `records`.
pub fn summarize(records: &[RiskRecord]) -> RiskSummary {
    let total = records.len();
    let high_critical_count = records
        .iter()
        .filter(|record| record.level().is_elevated())
        .count();
    let score_sum: i64 = records.iter().map(|record| i64::from(record.score())).sum();

    RiskSummary {
        total,
        high_critical_count,
        low_medium_count: total - high_critical_count,
        average_score: mean_tenths(score_sum, total) as f64 / 10.0,
    }
}

/// Returns `round(sum / count, 1) * 10`, rounding half away from zero.
fn mean_tenths(sum: i64, count: usize) -> i64 {
    if count == 0 {
        return 0;
    }

    let count = count as i64;
    let scaled = sum * 10;
    // Division truncates toward zero; a remainder of at least half the
    // divisor moves one tenth further from zero.
    let quotient = scaled / count;
    let remainder = (scaled % count).abs();

    if remainder * 2 >= count {
        quotient + scaled.signum()
    } else {
        quotient
    }
}
