//! Shared fake transport for client integration tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use grc_risk_client::{ApiRequest, ApiResponse, RiskApiError, RiskTransport};

/// Transport that replays scripted responses and records every request.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ApiResponse, RiskApiError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    /// Creates a transport that answers with `responses` in order.
    pub fn new(responses: Vec<Result<ApiResponse, RiskApiError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Returns every request sent so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().expect("request lock should work").clone()
    }
}

impl RiskTransport for ScriptedTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, RiskApiError> {
        self.requests
            .lock()
            .expect("request lock should work")
            .push(request.clone());
        self.responses
            .lock()
            .expect("response lock should work")
            .pop_front()
            .unwrap_or_else(|| Err(RiskApiError::Connectivity("no scripted response".to_string())))
    }
}

/// Builds a successful JSON response.
#[allow(dead_code)]
pub fn json_ok(body: &str) -> Result<ApiResponse, RiskApiError> {
    Ok(ApiResponse {
        status: 200,
        body: body.as_bytes().to_vec(),
    })
}
