#![warn(missing_docs)]
//! # grc-risk-matrix
//!
//! ## Purpose
//! Aggregates risk records into the 5x5 likelihood x impact heatmap matrix.
//!
//! ## Responsibilities
//! - Count records per `(likelihood, impact)` cell.
//! - Keep per-cell asset names in input order, duplicates included.
//! - Skip records with out-of-range ratings without failing.
//!
//! ## Data flow
//! Snapshot records -> [`build_matrix`] -> [`RiskMatrix`] consumed by heatmap
//! rendering.
//!
//! ## Ownership and lifetimes
//! The matrix owns cloned asset names and shares nothing with the input or
//! with previously built matrices.
//!
//! ## Error model
//! Aggregation is infallible. Malformed upstream records are excluded and
//! reported through [`RiskMatrix::skipped`].

use grc_risk_core::{MAX_RATING, MIN_RATING, RiskLevel, RiskRecord, classify, risk_score};

/// Number of rating steps on each matrix axis.
pub const MATRIX_DIMENSION: usize = 5;

/// One heatmap cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatrixCell {
    /// Number of records rated at this cell.
    pub count: usize,
    /// Asset names of those records, in input order.
    pub asset_names: Vec<String>,
}

/// 5x5 matrix indexed by `(likelihood, impact)`, both in `[1, 5]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RiskMatrix {
    cells: [[MatrixCell; MATRIX_DIMENSION]; MATRIX_DIMENSION],
    skipped: usize,
}

impl RiskMatrix {
    /// Returns the cell at `(likelihood, impact)`, or `None` outside `[1, 5]`.
    pub fn cell(&self, likelihood: i32, impact: i32) -> Option<&MatrixCell> {
        let (row, col) = cell_index(likelihood, impact)?;
        Some(&self.cells[row][col])
    }

    /// Returns the record count at `(likelihood, impact)`, zero outside the grid.
    pub fn count(&self, likelihood: i32, impact: i32) -> usize {
        self.cell(likelihood, impact).map_or(0, |cell| cell.count)
    }

    /// Sum of all cell counts.
    pub fn total_count(&self) -> usize {
        self.cells.iter().flatten().map(|cell| cell.count).sum()
    }

    /// Number of input records excluded for out-of-range ratings.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Returns rows from likelihood 5 down to 1, each ordered by impact 1..5.
    ///
    /// This is the heatmap's visual layout: highest likelihood on top.
    pub fn rows_top_down(&self) -> impl Iterator<Item = (i32, &[MatrixCell; MATRIX_DIMENSION])> {
        self.cells
            .iter()
            .enumerate()
            .rev()
            .map(|(row, cells)| (row as i32 + MIN_RATING, cells))
    }
}

/// Builds a fresh heatmap matrix from a record snapshot.
///
/// # Semantics
/// Records whose likelihood or impact is outside `[1, 5]` are skipped
/// silently: not counted and not listed in any cell.
pub fn build_matrix(records: &[RiskRecord]) -> RiskMatrix {
    let mut matrix = RiskMatrix::default();

    for record in records {
        let Some((row, col)) = cell_index(record.likelihood(), record.impact()) else {
            matrix.skipped += 1;
            continue;
        };

        let cell = &mut matrix.cells[row][col];
        cell.count += 1;
        cell.asset_names.push(record.asset().to_string());
    }

    matrix
}

/// Heatmap color band for a cell, independent of its contents.
pub fn cell_level(likelihood: i32, impact: i32) -> RiskLevel {
    classify(risk_score(likelihood, impact))
}

fn cell_index(likelihood: i32, impact: i32) -> Option<(usize, usize)> {
    let in_range = |value: i32| (MIN_RATING..=MAX_RATING).contains(&value);
    if !in_range(likelihood) || !in_range(impact) {
        return None;
    }

    // Invariant:
    // - Ratings 1..=5 map onto zero-based indices 0..=4.
    Some(((likelihood - MIN_RATING) as usize, (impact - MIN_RATING) as usize))
}
