//! In-memory backend fixture for dashboard integration tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use grc_risk_app::Dashboard;
use grc_risk_client::{ApiRequest, ApiResponse, HttpMethod, RiskApiClient, RiskApiError, RiskTransport};

/// Fake backend serving `GET /risks` and `POST /assess-risk` from memory.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    rows: Mutex<Vec<serde_json::Value>>,
    offline: AtomicBool,
    reject_submissions: AtomicBool,
    requests: Mutex<Vec<ApiRequest>>,
}

#[allow(dead_code)]
impl InMemoryBackend {
    /// Seeds the backend with `(asset, threat, likelihood, impact)` rows.
    pub fn seeded(rows: &[(&str, &str, i32, i32)]) -> Arc<Self> {
        let backend = Arc::new(Self::default());
        for (asset, threat, likelihood, impact) in rows {
            backend.insert(asset, threat, *likelihood, *impact);
        }
        backend
    }

    /// Makes every later request fail with a connectivity error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Makes later submissions fail with HTTP 500.
    pub fn set_reject_submissions(&self, reject: bool) {
        self.reject_submissions.store(reject, Ordering::SeqCst);
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("request lock should work").clone()
    }

    fn insert(&self, asset: &str, threat: &str, likelihood: i32, impact: i32) -> serde_json::Value {
        let mut rows = self.rows.lock().expect("rows lock should work");
        let score = likelihood * impact;
        let level = match score {
            ..=5 => "Low",
            6..=12 => "Medium",
            13..=18 => "High",
            _ => "Critical",
        };
        let row = serde_json::json!({
            "id": rows.len() + 1,
            "asset": asset,
            "threat": threat,
            "likelihood": likelihood,
            "impact": impact,
            "score": score,
            "level": level,
        });
        rows.push(row.clone());
        row
    }
}

impl RiskTransport for InMemoryBackend {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, RiskApiError> {
        self.requests
            .lock()
            .expect("request lock should work")
            .push(request.clone());

        if self.offline.load(Ordering::SeqCst) {
            return Err(RiskApiError::Connectivity("connection refused".to_string()));
        }

        match (request.method, request.url.path()) {
            (HttpMethod::Get, "/risks") => {
                let rows = self.rows.lock().expect("rows lock should work");
                Ok(json_response(200, &serde_json::Value::Array(rows.clone())))
            }
            (HttpMethod::Post, "/assess-risk") => {
                if self.reject_submissions.load(Ordering::SeqCst) {
                    return Ok(json_response(
                        500,
                        &serde_json::json!({ "detail": "database unavailable" }),
                    ));
                }
                let body: serde_json::Value =
                    serde_json::from_slice(request.body.as_deref().unwrap_or_default())
                        .expect("submission body should be json");
                let row = self.insert(
                    body["asset"].as_str().unwrap_or_default(),
                    body["threat"].as_str().unwrap_or_default(),
                    body["likelihood"].as_i64().unwrap_or_default() as i32,
                    body["impact"].as_i64().unwrap_or_default() as i32,
                );
                Ok(json_response(200, &row))
            }
            _ => Ok(json_response(404, &serde_json::json!({ "detail": "Not Found" }))),
        }
    }
}

fn json_response(status: u16, value: &serde_json::Value) -> ApiResponse {
    ApiResponse {
        status,
        body: serde_json::to_vec(value).expect("fixture json should serialize"),
    }
}

/// Builds a dashboard wired to `backend`.
#[allow(dead_code)]
pub fn dashboard_for(backend: &Arc<InMemoryBackend>) -> Dashboard {
    let client = RiskApiClient::new("http://localhost:8000", backend.clone())
        .expect("fixture client should build");
    Dashboard::new(client)
}

/// Register used by most dashboard tests.
#[allow(dead_code)]
pub fn sample_register() -> Arc<InMemoryBackend> {
    InMemoryBackend::seeded(&[
        ("Customer Database", "SQL Injection", 4, 5),
        ("Email Server", "Phishing Campaign", 3, 3),
        ("Web Portal", "DDoS Attack", 4, 4),
        ("Backup NAS", "Ransomware", 2, 2),
    ])
}
