#![warn(missing_docs)]
//! # grc-risk-client
//!
//! ## Purpose
//! Talks to the risk assessment backend: fetches the register and submits
//! new assessments.
//!
//! ## Responsibilities
//! - Validate the backend base URL (`http`/`https`).
//! - Build `GET /risks[?level=..]`, `POST /assess-risk`, and `GET /` requests.
//! - Execute requests through an injectable [`RiskTransport`].
//! - Decode responses into core records and classify failures.
//!
//! ## Data flow
//! App refresh -> [`RiskApiClient::fetch_risks`] -> [`RiskTransport::send`]
//! -> JSON body -> `Vec<RiskRecord>` snapshot.
//! Form input -> [`RiskApiClient::submit_risk`] -> created [`RiskRecord`].
//!
//! ## Ownership and lifetimes
//! Requests and responses own their byte buffers so transports can be swapped
//! (real HTTP, in-memory fakes) without borrowing client state.
//!
//! ## Error model
//! Every failure is a [`RiskApiError`]. [`classify_api_error`] tells callers
//! whether a retry can help; the client itself never retries.

use std::sync::Arc;
use std::time::Duration;

use grc_risk_core::{CoreError, RiskAssessment, RiskRecord};
use grc_risk_view::LevelFilter;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Default request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;
/// Collection endpoint, relative to the base URL.
pub const RISKS_PATH: &str = "risks";
/// Submission endpoint, relative to the base URL.
pub const ASSESS_PATH: &str = "assess-risk";

/// HTTP method used by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`.
    Get,
    /// `POST` with a JSON body.
    Post,
}

/// Request handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute request URL.
    pub url: Url,
    /// JSON body for `POST`.
    pub body: Option<Vec<u8>>,
}

/// Raw transport response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Backend health payload from `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    /// Human-readable status message.
    pub message: String,
    /// Status keyword, `ok` when healthy.
    pub status: String,
}

/// Abstract transport used by [`RiskApiClient`].
pub trait RiskTransport: Send + Sync {
    /// Sends one request and returns the raw response.
    ///
    /// Non-2xx statuses are returned as responses, not errors.
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, RiskApiError>;
}

/// Blocking HTTP transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Builds a transport with the given request timeout.
    ///
    /// # Errors
    /// Returns [`RiskApiError::Connectivity`] when the HTTP client cannot be
    /// initialized.
    pub fn new(timeout_ms: u64) -> Result<Self, RiskApiError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|error| RiskApiError::Connectivity(error.to_string()))?;
        Ok(Self { client })
    }
}

impl RiskTransport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, RiskApiError> {
        let builder = match request.method {
            HttpMethod::Get => self.client.get(request.url.clone()),
            HttpMethod::Post => self.client.post(request.url.clone()),
        }
        .header(reqwest::header::CONTENT_TYPE, "application/json");

        let builder = match &request.body {
            Some(body) => builder.body(body.clone()),
            None => builder,
        };

        let response = builder.send().map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().map_err(map_reqwest_error)?.to_vec();
        Ok(ApiResponse { status, body })
    }
}

fn map_reqwest_error(error: reqwest::Error) -> RiskApiError {
    if error.is_timeout() {
        RiskApiError::Timeout
    } else {
        RiskApiError::Connectivity(error.to_string())
    }
}

/// Client for the risk assessment backend.
#[derive(Clone)]
pub struct RiskApiClient {
    base_url: Url,
    transport: Arc<dyn RiskTransport>,
}

impl RiskApiClient {
    /// Creates a client for `base_url`.
    ///
    /// # Errors
    /// Returns [`RiskApiError::InvalidEndpoint`] when the URL does not parse or
    /// does not use `http`/`https`.
    pub fn new(base_url: &str, transport: Arc<dyn RiskTransport>) -> Result<Self, RiskApiError> {
        let base_url = validate_base_url(base_url)?;
        Ok(Self {
            base_url,
            transport,
        })
    }

    /// Returns the normalized base URL (always ending with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetches the full register, optionally filtered server-side by level.
    ///
    /// # Errors
    /// Transport, status, and decode failures as [`RiskApiError`].
    pub fn fetch_risks(&self, filter: LevelFilter) -> Result<Vec<RiskRecord>, RiskApiError> {
        let mut url = self.endpoint(RISKS_PATH)?;
        if let Some(level) = filter.level() {
            url.query_pairs_mut().append_pair("level", level.as_str());
        }

        let response = self.execute(
            "fetch_risks",
            ApiRequest {
                method: HttpMethod::Get,
                url,
                body: None,
            },
        )?;

        let records = RiskRecord::list_from_json_bytes(&response.body).map_err(|error| {
            tracing::error!(stage = "api", action = "fetch_risks", %error, "risk list decode failed");
            RiskApiError::Decode(error)
        })?;

        tracing::debug!(stage = "api", action = "fetch_risks", count = records.len(), "risks fetched");
        Ok(records)
    }

    /// Submits a new assessment and returns the record created by the backend.
    ///
    /// Callers should re-fetch the register afterwards; no local insert is
    /// performed.
    ///
    /// # Errors
    /// Returns [`RiskApiError::InvalidAssessment`] before any request when the
    /// assessment fails validation; otherwise transport, status, and decode
    /// failures.
    pub fn submit_risk(&self, assessment: &RiskAssessment) -> Result<RiskRecord, RiskApiError> {
        assessment
            .validate()
            .map_err(RiskApiError::InvalidAssessment)?;
        let body = assessment.to_json_bytes().map_err(RiskApiError::Decode)?;

        let response = self.execute(
            "submit_risk",
            ApiRequest {
                method: HttpMethod::Post,
                url: self.endpoint(ASSESS_PATH)?,
                body: Some(body),
            },
        )?;

        let record = RiskRecord::from_json_bytes(&response.body).map_err(RiskApiError::Decode)?;
        tracing::info!(
            stage = "api",
            action = "submit_risk",
            id = %record.id(),
            level = %record.level(),
            "risk created"
        );
        Ok(record)
    }

    /// Checks backend liveness via `GET /`.
    ///
    /// # Errors
    /// Transport, status, and decode failures as [`RiskApiError`].
    pub fn health(&self) -> Result<HealthStatus, RiskApiError> {
        let response = self.execute(
            "health",
            ApiRequest {
                method: HttpMethod::Get,
                url: self.base_url.clone(),
                body: None,
            },
        )?;

        serde_json::from_slice(&response.body)
            .map_err(|error| RiskApiError::Decode(CoreError::Codec(error)))
    }

    fn endpoint(&self, path: &str) -> Result<Url, RiskApiError> {
        self.base_url
            .join(path)
            .map_err(|error| RiskApiError::InvalidEndpoint(format!("cannot join {path}: {error}")))
    }

    fn execute(&self, action: &'static str, request: ApiRequest) -> Result<ApiResponse, RiskApiError> {
        let response = self.transport.send(&request).inspect_err(|error| {
            tracing::error!(
                stage = "api",
                action,
                url = %request.url,
                %error,
                "network error: backend might be down"
            );
        })?;

        if response.is_success() {
            return Ok(response);
        }

        let detail = error_detail(&response.body);
        tracing::error!(
            stage = "api",
            action,
            status = response.status,
            detail = detail.as_deref().unwrap_or(""),
            "api error"
        );
        Err(RiskApiError::Status {
            status: response.status,
            detail,
        })
    }
}

/// Validates and normalizes a backend base URL.
///
/// A trailing `/` is appended to the path so relative endpoints join beneath
/// it (`http://host/api` -> `http://host/api/risks`).
///
/// # Errors
/// Returns [`RiskApiError::InvalidEndpoint`] for unparsable or non-HTTP URLs.
pub fn validate_base_url(raw: &str) -> Result<Url, RiskApiError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|error| RiskApiError::InvalidEndpoint(format!("invalid api url: {error}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(RiskApiError::InvalidEndpoint(format!(
            "api url must use http or https, got {}",
            url.scheme()
        )));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Extracts the FastAPI-style `detail` field from an error body.
fn error_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(detail) => Some(detail.clone()),
        other => Some(other.to_string()),
    }
}

/// Retry guidance for a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// A later attempt may succeed.
    Retriable,
    /// Retrying the same request will fail again.
    Permanent,
}

/// Classifies an API error for caller retry decisions.
pub fn classify_api_error(error: &RiskApiError) -> FailureClass {
    match error {
        RiskApiError::Timeout | RiskApiError::Connectivity(_) => FailureClass::Retriable,
        RiskApiError::Status { status, .. } if *status >= 500 || *status == 429 => {
            FailureClass::Retriable
        }
        RiskApiError::Status { .. }
        | RiskApiError::InvalidEndpoint(_)
        | RiskApiError::InvalidAssessment(_)
        | RiskApiError::Decode(_) => FailureClass::Permanent,
    }
}

/// Errors produced by the risk API client.
#[derive(Debug, Error)]
pub enum RiskApiError {
    /// Base URL is malformed or uses an unsupported scheme.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    /// Assessment rejected before submission.
    #[error("invalid assessment: {0}")]
    InvalidAssessment(#[source] CoreError),
    /// Backend unreachable or connection dropped.
    #[error("connectivity failure: {0}")]
    Connectivity(String),
    /// Request exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,
    /// Backend answered with a non-2xx status.
    #[error("api returned status {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status {
        /// HTTP status code.
        status: u16,
        /// `detail` message from the error body, when present.
        detail: Option<String>,
    },
    /// Response body did not match the record contract.
    #[error("response decode failure: {0}")]
    Decode(#[source] CoreError),
}
