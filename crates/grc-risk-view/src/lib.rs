#![warn(missing_docs)]
//! # grc-risk-view
//!
//! ## Purpose
//! Derives the risk register table: a filtered, searched, and sorted
//! projection of a record snapshot.
//!
//! ## Responsibilities
//! - Filter by level, then by free-text search over asset and threat.
//! - Stable sort on any column, ascending or descending.
//! - Model the column-header toggle that owns sort state.
//!
//! ## Data flow
//! Snapshot records + [`ViewQuery`] -> [`view`] -> ordered rows for table
//! rendering and CSV export.
//!
//! ## Ownership and lifetimes
//! The view returns owned clones; the input snapshot is never reordered or
//! mutated.
//!
//! ## Error model
//! Projection is infallible. Parsing filter/sort names from user input fails
//! with [`ViewError`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use grc_risk_core::{RiskLevel, RiskRecord};
use thiserror::Error;

/// Level filter applied before search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelFilter {
    /// Keep every record.
    #[default]
    All,
    /// Keep only records at this level.
    Only(RiskLevel),
}

impl LevelFilter {
    /// Returns `true` when `record` passes the filter.
    pub fn matches(self, record: &RiskRecord) -> bool {
        match self {
            LevelFilter::All => true,
            LevelFilter::Only(level) => record.level() == level,
        }
    }

    /// Returns the selected level, or `None` for [`LevelFilter::All`].
    pub fn level(self) -> Option<RiskLevel> {
        match self {
            LevelFilter::All => None,
            LevelFilter::Only(level) => Some(level),
        }
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelFilter::All => f.write_str("All"),
            LevelFilter::Only(level) => write!(f, "{level}"),
        }
    }
}

impl FromStr for LevelFilter {
    type Err = ViewError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(LevelFilter::All);
        }

        raw.parse::<RiskLevel>()
            .map(LevelFilter::Only)
            .map_err(|_| ViewError::UnknownLevelFilter(raw.to_string()))
    }
}

/// Sortable table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    /// Record id.
    Id,
    /// Asset name.
    Asset,
    /// Threat description.
    Threat,
    /// Likelihood rating.
    Likelihood,
    /// Impact rating.
    Impact,
    /// Derived score.
    Score,
    /// Level, compared by its literal name.
    Level,
}

impl SortKey {
    /// All keys in table column order.
    pub const ALL: [SortKey; 7] = [
        SortKey::Id,
        SortKey::Asset,
        SortKey::Threat,
        SortKey::Likelihood,
        SortKey::Impact,
        SortKey::Score,
        SortKey::Level,
    ];

    /// Returns the record field name for this key.
    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Asset => "asset",
            SortKey::Threat => "threat",
            SortKey::Likelihood => "likelihood",
            SortKey::Impact => "impact",
            SortKey::Score => "score",
            SortKey::Level => "level",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = ViewError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| ViewError::UnknownSortKey(raw.to_string()))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// Returns the opposite direction.
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = ViewError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(ViewError::UnknownDirection(raw.to_string())),
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    /// Column being sorted.
    pub key: SortKey,
    /// Sort direction.
    pub direction: SortDirection,
}

impl Default for SortConfig {
    /// Highest scores first, matching the register's initial layout.
    fn default() -> Self {
        Self {
            key: SortKey::Score,
            direction: SortDirection::Desc,
        }
    }
}

impl SortConfig {
    /// Applies a column-header click.
    ///
    /// Clicking the active column while ascending switches to descending;
    /// any other click sorts `key` ascending.
    pub fn toggle(&mut self, key: SortKey) {
        self.direction = if self.key == key && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        self.key = key;
    }
}

/// Complete set of table view parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewQuery {
    /// Level filter.
    pub level_filter: LevelFilter,
    /// Free-text search over asset and threat.
    pub search_query: String,
    /// Sort column and direction.
    pub sort: SortConfig,
}

impl ViewQuery {
    /// Projects `records` through this query.
    pub fn apply(&self, records: &[RiskRecord]) -> Vec<RiskRecord> {
        view(
            records,
            self.level_filter,
            &self.search_query,
            self.sort.key,
            self.sort.direction,
        )
    }
}

/// Filters, searches, and stably sorts a record snapshot.
///
/// # Semantics
/// 1. Level filter.
/// 2. Trimmed, case-insensitive substring search over asset OR threat; a
///    blank query keeps everything.
/// 3. Stable sort on `sort_key`; equal keys keep input order in either
///    direction.
pub fn view(
    records: &[RiskRecord],
    level_filter: LevelFilter,
    search_query: &str,
    sort_key: SortKey,
    sort_direction: SortDirection,
) -> Vec<RiskRecord> {
    let needle = search_query.trim().to_lowercase();

    let mut rows: Vec<RiskRecord> = records
        .iter()
        .filter(|record| level_filter.matches(record))
        .filter(|record| needle.is_empty() || matches_search(record, &needle))
        .cloned()
        .collect();

    // `sort_by` is stable; descending reverses the comparison, not the rows,
    // so ties are never reordered.
    rows.sort_by(|a, b| sort_direction.apply(compare_by(sort_key, a, b)));
    rows
}

/// Compares two records on one column.
///
/// Numeric columns compare numerically, text columns case-sensitively, and
/// `level` by its literal name (`Critical < High < Low < Medium`).
pub fn compare_by(key: SortKey, a: &RiskRecord, b: &RiskRecord) -> Ordering {
    match key {
        SortKey::Id => a.id().cmp(b.id()),
        SortKey::Asset => a.asset().cmp(b.asset()),
        SortKey::Threat => a.threat().cmp(b.threat()),
        SortKey::Likelihood => a.likelihood().cmp(&b.likelihood()),
        SortKey::Impact => a.impact().cmp(&b.impact()),
        SortKey::Score => a.score().cmp(&b.score()),
        SortKey::Level => a.level().as_str().cmp(b.level().as_str()),
    }
}

fn matches_search(record: &RiskRecord, needle: &str) -> bool {
    record.asset().to_lowercase().contains(needle) || record.threat().to_lowercase().contains(needle)
}

/// Errors raised when parsing view parameters from user input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewError {
    /// Filter is neither `All` nor a level name.
    #[error("unknown level filter: {0}")]
    UnknownLevelFilter(String),
    /// Not a sortable column.
    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),
    /// Not `asc` or `desc`.
    #[error("unknown sort direction: {0}")]
    UnknownDirection(String),
}
