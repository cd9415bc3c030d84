#![warn(missing_docs)]
//! # grc-risk-app
//!
//! ## Purpose
//! Orchestrates fetch, submission, and derived views for the risk dashboard.
//!
//! ## Responsibilities
//! - Load endpoint configuration from the environment.
//! - Hold the last fetched register snapshot and the table view query.
//! - Keep the stale snapshot visible when a refresh fails.
//! - Project a snapshot into summary, heatmap matrix, and table rows.
//! - Export the current table rows as a dated CSV file.
//!
//! ## Data flow
//! [`Dashboard::refresh`] -> client fetch -> snapshot -> [`Dashboard::project`]
//! -> summary + matrix + view rows -> text rendering / [`Dashboard::export`].
//!
//! ## Ownership and lifetimes
//! The dashboard owns its snapshot. Projections are fresh owned values, so
//! callers may keep one across later refreshes.
//!
//! ## Error model
//! Client failures are wrapped in [`AppError`], which also carries the
//! user-facing message for each failure kind.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use grc_risk_client::{DEFAULT_TIMEOUT_MS, HttpTransport, RiskApiClient, RiskApiError};
use grc_risk_core::{RiskAssessment, RiskRecord, mitigation_suggestion};
use grc_risk_export::{export_file_name, to_csv};
use grc_risk_matrix::{RiskMatrix, build_matrix, cell_level};
use grc_risk_summary::{RiskSummary, summarize};
use grc_risk_view::{LevelFilter, SortConfig, SortKey, ViewQuery};
use thiserror::Error;
use time::Date;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("GRC_RISK_VERSION");

/// Backend URL used when `GRC_RISK_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// Env var naming the backend base URL.
pub const API_URL_ENV: &str = "GRC_RISK_API_URL";
/// Env var holding the request timeout in milliseconds.
pub const TIMEOUT_ENV: &str = "GRC_RISK_TIMEOUT_MS";

/// Message shown when the register cannot be loaded.
pub const LOAD_FAILURE_MESSAGE: &str = "Unable to load risk data. Please check your connection.";
/// Message shown when a submission fails.
pub const SUBMIT_FAILURE_MESSAGE: &str = "Failed to submit risk assessment. Please try again.";
/// Message shown after a successful submission.
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Risk assessment submitted successfully!";

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Backend connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Backend base URL.
    pub api_url: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl DashboardConfig {
    /// Reads configuration from process env vars.
    ///
    /// Semantics:
    /// - Unset or blank `GRC_RISK_API_URL` => [`DEFAULT_API_URL`].
    /// - Unset, unparsable, or zero `GRC_RISK_TIMEOUT_MS` => 5000.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_url = lookup(API_URL_ENV)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout_ms = lookup(TIMEOUT_ENV)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            api_url,
            timeout_ms,
        }
    }

    /// Builds an HTTP-backed client from this configuration.
    ///
    /// # Errors
    /// Returns [`AppError::Client`] for an invalid URL or HTTP client setup
    /// failure.
    pub fn build_client(&self) -> Result<RiskApiClient, AppError> {
        let transport = HttpTransport::new(self.timeout_ms).map_err(AppError::Client)?;
        RiskApiClient::new(&self.api_url, std::sync::Arc::new(transport)).map_err(AppError::Client)
    }
}

/// Availability of the register data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStatus {
    /// Nothing fetched yet.
    Idle,
    /// Last refresh succeeded.
    Ready,
    /// Last refresh failed; any snapshot shown is stale.
    Unavailable,
}

/// Derived dashboard state for one snapshot and query.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Summary card values over the whole snapshot.
    pub summary: RiskSummary,
    /// Heatmap over the whole snapshot.
    pub matrix: RiskMatrix,
    /// Table rows after filter, search, and sort.
    pub rows: Vec<RiskRecord>,
    /// Data availability.
    pub status: DataStatus,
    /// User-facing error banner, if any.
    pub error: Option<String>,
    /// Snapshot revision the view was derived from.
    pub revision: u64,
}

/// CSV export ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// Suggested file name, `risk_assessment_<date>.csv`.
    pub file_name: String,
    /// CSV text.
    pub contents: String,
}

/// Dashboard controller holding the register snapshot and view query.
pub struct Dashboard {
    client: RiskApiClient,
    snapshot: Vec<RiskRecord>,
    query: ViewQuery,
    status: DataStatus,
    error: Option<String>,
    revision: u64,
}

impl Dashboard {
    /// Creates an empty dashboard with the default view query.
    pub fn new(client: RiskApiClient) -> Self {
        Self {
            client,
            snapshot: Vec::new(),
            query: ViewQuery::default(),
            status: DataStatus::Idle,
            error: None,
            revision: 0,
        }
    }

    /// Re-fetches the full register.
    ///
    /// On failure the previous snapshot stays in place, the status becomes
    /// [`DataStatus::Unavailable`], and the load-failure banner is set.
    ///
    /// # Errors
    /// Returns [`AppError::Fetch`] wrapping the client failure.
    pub fn refresh(&mut self) -> Result<usize, AppError> {
        match self.client.fetch_risks(LevelFilter::All) {
            Ok(records) => {
                let out_of_range = records.iter().filter(|record| !record.is_in_range()).count();
                if out_of_range > 0 {
                    tracing::warn!(
                        stage = "refresh",
                        action = "validate",
                        out_of_range,
                        "records with out-of-range ratings excluded from heatmap"
                    );
                }

                self.snapshot = records;
                self.revision += 1;
                self.status = DataStatus::Ready;
                self.error = None;
                tracing::info!(
                    stage = "refresh",
                    action = "completed",
                    count = self.snapshot.len(),
                    revision = self.revision,
                    "register refreshed"
                );
                Ok(self.snapshot.len())
            }
            Err(error) => {
                self.status = DataStatus::Unavailable;
                self.error = Some(LOAD_FAILURE_MESSAGE.to_string());
                tracing::error!(
                    stage = "refresh",
                    action = "failed",
                    stale_count = self.snapshot.len(),
                    %error,
                    "failed to fetch risks"
                );
                Err(AppError::Fetch(error))
            }
        }
    }

    /// Submits an assessment, then re-fetches the register.
    ///
    /// A failed follow-up refresh does not fail the submission; it is
    /// reflected in [`Dashboard::status`] instead.
    ///
    /// # Errors
    /// Returns [`AppError::Submit`] when the backend rejects or never receives
    /// the assessment.
    pub fn submit(&mut self, assessment: &RiskAssessment) -> Result<RiskRecord, AppError> {
        let record = self.client.submit_risk(assessment).map_err(|error| {
            tracing::error!(stage = "submit", action = "failed", %error, "submission failed");
            AppError::Submit(error)
        })?;

        let _ = self.refresh();
        Ok(record)
    }

    /// Backend client.
    pub fn client(&self) -> &RiskApiClient {
        &self.client
    }

    /// Current table query.
    pub fn query(&self) -> &ViewQuery {
        &self.query
    }

    /// Replaces the level filter.
    pub fn set_level_filter(&mut self, filter: LevelFilter) {
        self.query.level_filter = filter;
    }

    /// Replaces the search text.
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.query.search_query = search.into();
    }

    /// Replaces the sort column and direction.
    pub fn set_sort(&mut self, sort: SortConfig) {
        self.query.sort = sort;
    }

    /// Applies a column-header click to the sort state.
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.query.sort.toggle(key);
    }

    /// Last fetched records, in backend order.
    pub fn snapshot(&self) -> &[RiskRecord] {
        &self.snapshot
    }

    /// Data availability.
    pub fn status(&self) -> DataStatus {
        self.status
    }

    /// User-facing error banner, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of successful refreshes so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current table rows.
    pub fn rows(&self) -> Vec<RiskRecord> {
        self.query.apply(&self.snapshot)
    }

    /// Derives summary, heatmap, and table rows from the snapshot.
    pub fn project(&self) -> DashboardView {
        DashboardView {
            summary: summarize(&self.snapshot),
            matrix: build_matrix(&self.snapshot),
            rows: self.rows(),
            status: self.status,
            error: self.error.clone(),
            revision: self.revision,
        }
    }

    /// Exports the current table rows as CSV named for `date`.
    pub fn export(&self, date: Date) -> CsvExport {
        CsvExport {
            file_name: export_file_name(date),
            contents: to_csv(&self.rows()),
        }
    }
}

/// Writes an export into `dir`, returning the created file path.
///
/// # Errors
/// Returns [`AppError::Io`] when the file cannot be written.
pub fn write_export(dir: &Path, export: &CsvExport) -> Result<PathBuf, AppError> {
    let path = dir.join(&export.file_name);
    std::fs::write(&path, export.contents.as_bytes())?;
    tracing::info!(
        stage = "export",
        action = "written",
        path = %path.display(),
        bytes = export.contents.len(),
        "csv export written"
    );
    Ok(path)
}

/// Renders the summary cards as text.
pub fn render_summary(summary: &RiskSummary) -> String {
    format!(
        "Total Risks: {}  |  High & Critical: {}  |  Low & Medium: {}  |  Average Score: {}",
        summary.total,
        summary.high_critical_count,
        summary.low_medium_count,
        summary.average_score_display()
    )
}

/// Renders the heatmap, likelihood 5 on top, impact 1..5 left to right.
///
/// Each cell shows its count (`.` when empty) followed by the band initial.
pub fn render_heatmap(matrix: &RiskMatrix) -> String {
    let mut out = String::from("LIKELIHOOD\n");
    for (likelihood, cells) in matrix.rows_top_down() {
        let _ = write!(out, "{likelihood:>3} |");
        for (offset, cell) in cells.iter().enumerate() {
            let impact = offset as i32 + 1;
            let count = if cell.count == 0 {
                ".".to_string()
            } else {
                cell.count.to_string()
            };
            let band = &cell_level(likelihood, impact).as_str()[..1];
            let _ = write!(out, " {count:>3}{band}");
        }
        out.push('\n');
    }
    out.push_str("      ");
    for impact in 1..=5 {
        let _ = write!(out, " {impact:>4}");
    }
    out.push_str("\n       IMPACT");
    out
}

/// Renders table rows with mitigation guidance.
pub fn render_table(rows: &[RiskRecord]) -> String {
    if rows.is_empty() {
        return "No risks found".to_string();
    }

    let mut out = format!(
        "{:<6} {:<24} {:<28} {:>2} {:>2} {:>5} {:<9} {}",
        "ID", "Asset", "Threat", "L", "I", "Score", "Level", "Mitigation"
    );
    for record in rows {
        let _ = write!(
            out,
            "\n{:<6} {:<24} {:<28} {:>2} {:>2} {:>5} {:<9} {}",
            format!("#{}", record.id()),
            record.asset(),
            record.threat(),
            record.likelihood(),
            record.impact(),
            record.score(),
            record.level().as_str(),
            mitigation_suggestion(record.level())
        );
        if let Some(hint) = record.compliance_hint() {
            let _ = write!(out, " ({hint})");
        }
    }
    out
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Client construction failed.
    #[error("client error: {0}")]
    Client(#[source] RiskApiError),
    /// Register fetch failed.
    #[error("fetch error: {0}")]
    Fetch(#[source] RiskApiError),
    /// Assessment submission failed.
    #[error("submit error: {0}")]
    Submit(#[source] RiskApiError),
    /// Export file write failed.
    #[error("export io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Returns the message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Fetch(_) => LOAD_FAILURE_MESSAGE.to_string(),
            AppError::Submit(RiskApiError::InvalidAssessment(reason)) => {
                format!("Invalid assessment: {reason}")
            }
            AppError::Submit(_) => SUBMIT_FAILURE_MESSAGE.to_string(),
            AppError::Client(error) => error.to_string(),
            AppError::Io(error) => format!("Unable to write export: {error}"),
        }
    }
}
