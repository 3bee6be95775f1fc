//! Request and response types for the compute-service wire protocol.

use quarry_ir::{Counts, Op};
use serde::{Deserialize, Serialize};

/// Request body for `POST /api/quantum/execute`.
#[derive(Debug, Clone, Serialize)]
pub struct ExecuteRequest {
    /// The full accumulated program, in append order.
    pub operations: Vec<Op>,
    /// Requested repetition count.
    pub shots: u32,
}

impl ExecuteRequest {
    /// Build a request from a program snapshot and shot count.
    pub fn new(operations: impl Into<Vec<Op>>, shots: u32) -> Self {
        Self {
            operations: operations.into(),
            shots,
        }
    }
}

/// Response from `POST /api/quantum/execute`.
///
/// A well-formed response always carries `success`; the remaining
/// fields depend on it. Older service revisions report the summary in
/// `result` rather than `result_text`, so both are accepted.
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteResponse {
    /// Whether the remote execution succeeded.
    pub success: bool,

    /// Textual summary of the outcome distribution.
    #[serde(default)]
    pub result_text: Option<String>,

    /// Legacy name for the textual summary.
    #[serde(default)]
    pub result: Option<String>,

    /// Outcome histogram, present on success.
    #[serde(default)]
    pub counts: Option<Counts>,

    /// Error message, present when `success` is false.
    #[serde(default)]
    pub error: Option<String>,

    /// Wall-clock seconds the service spent executing.
    #[serde(default)]
    pub execution_time: Option<f64>,
}

impl ExecuteResponse {
    /// The textual summary: `result_text` falling back to `result`.
    pub fn text(&self) -> Option<&str> {
        self.result_text.as_deref().or(self.result.as_deref())
    }
}

/// Request body for `POST /api/visualization/histogram`.
///
/// `data` is the raw result text to chart; the service parses it.
#[derive(Debug, Clone, Serialize)]
pub struct HistogramRequest {
    /// Raw result data to render.
    pub data: String,
}

/// Request body for `POST /api/visualization/circuit`.
#[derive(Debug, Clone, Serialize)]
pub struct DiagramRequest {
    /// The full accumulated program to diagram, in append order.
    pub operations: Vec<Op>,
}

/// Response from either render endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderResponse {
    /// Whether rendering succeeded.
    pub success: bool,

    /// Base64-encoded PNG, present on success.
    #[serde(default)]
    pub image_base64: Option<String>,

    /// Error message, present when `success` is false.
    #[serde(default)]
    pub error: Option<String>,
}

/// Response from `GET /api/quantum/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    /// Service-reported status string (`"ok"` when healthy).
    pub status: String,

    /// Service name, if reported.
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthResponse {
    /// Whether the service reports itself healthy.
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
