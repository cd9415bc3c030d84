#![warn(missing_docs)]
//! # grc-risk-core
//!
//! ## Purpose
//! Defines the pure risk data model and the likelihood x impact classifier
//! shared across the `grc-risk` workspace.
//!
//! ## Responsibilities
//! - Score assessments (`likelihood * impact`) and classify scores into
//!   [`RiskLevel`] buckets.
//! - Represent backend risk records with derived, never-settable score/level.
//! - Validate new assessments before they are submitted.
//! - Provide advisory compliance and mitigation text per level.
//!
//! ## Data flow
//! Backend JSON -> [`RiskRecord::list_from_json_bytes`] (score and level are
//! recomputed locally) -> matrix, summary, and view crates.
//! User input -> [`RiskAssessment::new`] -> client submission.
//!
//! ## Ownership and lifetimes
//! Records own their strings so snapshots can outlive the network buffers
//! they were decoded from.
//!
//! ## Error model
//! Validation and codec failures return [`CoreError`]. The classifier itself
//! is total and never fails.
//!
//! ## Example
//! ```rust
//! use grc_risk_core::{classify, risk_score, RiskLevel};
//!
//! assert_eq!(risk_score(4, 5), 20);
//! assert_eq!(classify(20), RiskLevel::Critical);
//! assert_eq!(classify(12), RiskLevel::Medium);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest valid likelihood/impact rating.
pub const MIN_RATING: i32 = 1;
/// Highest valid likelihood/impact rating.
pub const MAX_RATING: i32 = 5;
/// Maximum character length accepted for asset and threat text.
pub const MAX_TEXT_LEN: usize = 200;

/// Inclusive upper score bound for [`RiskLevel::Low`].
pub const LOW_MAX_SCORE: i32 = 5;
/// Inclusive upper score bound for [`RiskLevel::Medium`].
pub const MEDIUM_MAX_SCORE: i32 = 12;
/// Inclusive upper score bound for [`RiskLevel::High`].
pub const HIGH_MAX_SCORE: i32 = 18;

/// Qualitative risk level derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Score 5 or below.
    Low,
    /// Score 6 to 12.
    Medium,
    /// Score 13 to 18.
    High,
    /// Score above 18.
    Critical,
}

impl RiskLevel {
    /// All levels in ascending severity.
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Medium,
        RiskLevel::High,
        RiskLevel::Critical,
    ];

    /// Returns the literal level name used on the wire and in exports.
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::Critical => "Critical",
        }
    }

    /// Returns severity rank, 1 (Low) through 4 (Critical).
    pub fn severity_rank(self) -> u8 {
        match self {
            RiskLevel::Low => 1,
            RiskLevel::Medium => 2,
            RiskLevel::High => 3,
            RiskLevel::Critical => 4,
        }
    }

    /// Returns `true` for High and Critical.
    pub fn is_elevated(self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Critical)
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        RiskLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(raw.trim()))
            .ok_or_else(|| CoreError::UnknownLevel(raw.to_string()))
    }
}

/// Computes the risk score for one assessment.
///
/// Callers are responsible for range validation; out-of-range inputs are
/// multiplied as-is (saturating on overflow).
pub fn risk_score(likelihood: i32, impact: i32) -> i32 {
    likelihood.saturating_mul(impact)
}

/// Classifies a score into a [`RiskLevel`].
///
/// # Semantics
/// Inclusive upper bounds evaluated in ascending order, first match wins:
/// `<= 5` Low, `<= 12` Medium, `<= 18` High, otherwise Critical.
pub fn classify(score: i32) -> RiskLevel {
    match score {
        s if s <= LOW_MAX_SCORE => RiskLevel::Low,
        s if s <= MEDIUM_MAX_SCORE => RiskLevel::Medium,
        s if s <= HIGH_MAX_SCORE => RiskLevel::High,
        _ => RiskLevel::Critical,
    }
}

/// Returns `true` when `value` is a valid likelihood/impact rating.
pub fn is_valid_rating(value: i32) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&value)
}

/// Returns the advisory compliance hint attached to elevated levels.
pub fn compliance_hint_for(level: RiskLevel) -> Option<&'static str> {
    match level {
        RiskLevel::High => Some("Prioritize per NIST SP 800-30"),
        RiskLevel::Critical => Some("Immediate executive action required"),
        RiskLevel::Low | RiskLevel::Medium => None,
    }
}

/// Returns the mitigation suggestion shown next to a level.
pub fn mitigation_suggestion(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "Monitor periodically",
        RiskLevel::Medium => "Develop mitigation plan",
        RiskLevel::High => "Prioritize action per NIST guidelines",
        RiskLevel::Critical => "Immediate response required",
    }
}

/// Backend-assigned record identifier.
///
/// Numeric ids order before text ids; within a variant the natural ordering
/// applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RiskId {
    /// Integer id (the backend's autoincrement key).
    Numeric(i64),
    /// Opaque string id.
    Text(String),
}

impl fmt::Display for RiskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskId::Numeric(value) => write!(f, "{value}"),
            RiskId::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for RiskId {
    fn from(value: i64) -> Self {
        RiskId::Numeric(value)
    }
}

impl From<i32> for RiskId {
    fn from(value: i32) -> Self {
        RiskId::Numeric(i64::from(value))
    }
}

impl From<&str> for RiskId {
    fn from(value: &str) -> Self {
        RiskId::Text(value.to_string())
    }
}

impl From<String> for RiskId {
    fn from(value: String) -> Self {
        RiskId::Text(value)
    }
}

/// One stored risk assessment.
///
/// `score` and `level` are always derived from `likelihood` and `impact`;
/// values sent by the backend for those two fields are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RiskRecordWire")]
pub struct RiskRecord {
    id: RiskId,
    asset: String,
    threat: String,
    likelihood: i32,
    impact: i32,
    score: i32,
    level: RiskLevel,
    compliance_hint: Option<String>,
}

#[derive(Deserialize)]
struct RiskRecordWire {
    id: RiskId,
    asset: String,
    threat: String,
    likelihood: i32,
    impact: i32,
    #[serde(default)]
    compliance_hint: Option<String>,
}

impl From<RiskRecordWire> for RiskRecord {
    fn from(wire: RiskRecordWire) -> Self {
        RiskRecord::from_parts(
            wire.id,
            wire.asset,
            wire.threat,
            wire.likelihood,
            wire.impact,
        )
        .with_compliance_hint(wire.compliance_hint)
    }
}

impl RiskRecord {
    /// Constructs a validated record.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyField`] for blank asset/threat and
    /// [`CoreError::RatingOutOfRange`] for ratings outside `[1, 5]`.
    pub fn new(
        id: impl Into<RiskId>,
        asset: impl Into<String>,
        threat: impl Into<String>,
        likelihood: i32,
        impact: i32,
    ) -> Result<Self, CoreError> {
        let record = Self::from_parts(id, asset, threat, likelihood, impact);
        require_text("asset", &record.asset)?;
        require_text("threat", &record.threat)?;
        require_rating("likelihood", likelihood)?;
        require_rating("impact", impact)?;
        Ok(record)
    }

    /// Constructs a record without validation, as received from upstream.
    ///
    /// Score and level are still derived, so the classification invariant
    /// holds even for out-of-range ratings.
    pub fn from_parts(
        id: impl Into<RiskId>,
        asset: impl Into<String>,
        threat: impl Into<String>,
        likelihood: i32,
        impact: i32,
    ) -> Self {
        let score = risk_score(likelihood, impact);
        Self {
            id: id.into(),
            asset: asset.into(),
            threat: threat.into(),
            likelihood,
            impact,
            score,
            level: classify(score),
            compliance_hint: None,
        }
    }

    /// Replaces the pass-through compliance hint.
    pub fn with_compliance_hint(mut self, hint: Option<String>) -> Self {
        self.compliance_hint = hint;
        self
    }

    /// Record identifier.
    pub fn id(&self) -> &RiskId {
        &self.id
    }

    /// Affected asset display name.
    pub fn asset(&self) -> &str {
        &self.asset
    }

    /// Threat scenario description.
    pub fn threat(&self) -> &str {
        &self.threat
    }

    /// Likelihood rating.
    pub fn likelihood(&self) -> i32 {
        self.likelihood
    }

    /// Impact rating.
    pub fn impact(&self) -> i32 {
        self.impact
    }

    /// Derived `likelihood * impact`.
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Derived classification of [`Self::score`].
    pub fn level(&self) -> RiskLevel {
        self.level
    }

    /// Advisory hint passed through from the backend.
    pub fn compliance_hint(&self) -> Option<&str> {
        self.compliance_hint.as_deref()
    }

    /// Returns `true` when both ratings are within `[1, 5]`.
    pub fn is_in_range(&self) -> bool {
        is_valid_rating(self.likelihood) && is_valid_rating(self.impact)
    }

    /// Decodes one record from JSON bytes.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when JSON decoding fails.
    pub fn from_json_bytes(raw: &[u8]) -> Result<Self, CoreError> {
        serde_json::from_slice(raw).map_err(CoreError::Codec)
    }

    /// Decodes a JSON array of records.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when JSON decoding fails.
    pub fn list_from_json_bytes(raw: &[u8]) -> Result<Vec<Self>, CoreError> {
        serde_json::from_slice(raw).map_err(CoreError::Codec)
    }

    /// Serializes the record, derived fields included, to compact JSON.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when JSON serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(self).map_err(CoreError::Codec)
    }
}

/// New assessment submitted by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Affected asset display name.
    pub asset: String,
    /// Threat scenario description.
    pub threat: String,
    /// Likelihood rating in `[1, 5]`.
    pub likelihood: i32,
    /// Impact rating in `[1, 5]`.
    pub impact: i32,
}

impl RiskAssessment {
    /// Constructs a validated assessment.
    ///
    /// # Errors
    /// See [`RiskAssessment::validate`].
    pub fn new(
        asset: impl Into<String>,
        threat: impl Into<String>,
        likelihood: i32,
        impact: i32,
    ) -> Result<Self, CoreError> {
        let assessment = Self {
            asset: asset.into(),
            threat: threat.into(),
            likelihood,
            impact,
        };
        assessment.validate()?;
        Ok(assessment)
    }

    /// Checks the submission contract accepted by the backend.
    ///
    /// # Errors
    /// - [`CoreError::EmptyField`] when asset or threat is blank.
    /// - [`CoreError::FieldTooLong`] when either exceeds [`MAX_TEXT_LEN`]
    ///   characters.
    /// - [`CoreError::RatingOutOfRange`] for ratings outside `[1, 5]`.
    pub fn validate(&self) -> Result<(), CoreError> {
        require_text("asset", &self.asset)?;
        require_text("threat", &self.threat)?;
        require_max_len("asset", &self.asset)?;
        require_max_len("threat", &self.threat)?;
        require_rating("likelihood", self.likelihood)?;
        require_rating("impact", self.impact)
    }

    /// Score the backend will assign to this assessment.
    pub fn preview_score(&self) -> i32 {
        risk_score(self.likelihood, self.impact)
    }

    /// Level the backend will assign to this assessment.
    pub fn preview_level(&self) -> RiskLevel {
        classify(self.preview_score())
    }

    /// Serializes the submission body.
    ///
    /// # Errors
    /// Returns [`CoreError::Codec`] when JSON serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec(self).map_err(CoreError::Codec)
    }
}

/// Error type for core validation and codec failures.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Likelihood or impact outside `[1, 5]`.
    #[error("{field} must be between 1 and 5, got {value}")]
    RatingOutOfRange {
        /// Offending field name.
        field: &'static str,
        /// Rejected value.
        value: i32,
    },
    /// Required text field is blank.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    /// Text field exceeds the accepted length.
    #[error("{field} exceeds {max} characters (got {actual})")]
    FieldTooLong {
        /// Offending field name.
        field: &'static str,
        /// Maximum accepted character count.
        max: usize,
        /// Actual character count.
        actual: usize,
    },
    /// Level name is not one of Low/Medium/High/Critical.
    #[error("unknown risk level: {0}")]
    UnknownLevel(String),
    /// JSON encoding/decoding error.
    #[error("risk codec failure: {0}")]
    Codec(#[from] serde_json::Error),
}

fn require_text(field: &'static str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::EmptyField(field));
    }
    Ok(())
}

fn require_max_len(field: &'static str, value: &str) -> Result<(), CoreError> {
    let actual = value.chars().count();
    if actual > MAX_TEXT_LEN {
        return Err(CoreError::FieldTooLong {
            field,
            max: MAX_TEXT_LEN,
            actual,
        });
    }
    Ok(())
}

fn require_rating(field: &'static str, value: i32) -> Result<(), CoreError> {
    if !is_valid_rating(value) {
        return Err(CoreError::RatingOutOfRange { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Unit tests for classification boundaries and record derivation.

    use super::*;

    #[test]
    fn classify_matches_threshold_boundaries() {
        assert_eq!(classify(5), RiskLevel::Low);
        assert_eq!(classify(6), RiskLevel::Medium);
        assert_eq!(classify(12), RiskLevel::Medium);
        assert_eq!(classify(13), RiskLevel::High);
        assert_eq!(classify(18), RiskLevel::High);
        assert_eq!(classify(19), RiskLevel::Critical);
        assert_eq!(classify(25), RiskLevel::Critical);
    }

    #[test]
    fn classify_is_total_outside_matrix_range() {
        assert_eq!(classify(0), RiskLevel::Low);
        assert_eq!(classify(-7), RiskLevel::Low);
        assert_eq!(classify(i32::MAX), RiskLevel::Critical);
    }

    #[test]
    fn from_parts_derives_score_and_level_for_out_of_range_ratings() {
        let record = RiskRecord::from_parts(7, "Edge", "Bad data", 6, 5);
        assert_eq!(record.score(), 30);
        assert_eq!(record.level(), RiskLevel::Critical);
        assert!(!record.is_in_range());
    }

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!("high".parse::<RiskLevel>().unwrap(), RiskLevel::High);
        assert!("severe".parse::<RiskLevel>().is_err());
    }

    #[test]
    fn compliance_hints_only_for_elevated_levels() {
        assert_eq!(compliance_hint_for(RiskLevel::Low), None);
        assert_eq!(compliance_hint_for(RiskLevel::Medium), None);
        assert_eq!(
            compliance_hint_for(RiskLevel::High),
            Some("Prioritize per NIST SP 800-30")
        );
        assert_eq!(
            compliance_hint_for(RiskLevel::Critical),
            Some("Immediate executive action required")
        );
    }
}
