//! Compute-service REST client.
//!
//! Implements the Quarry compute service API: circuit execution at
//! `POST /api/quantum/execute`, artifact rendering at
//! `POST /api/visualization/{histogram,circuit}`, and the liveness
//! probe at `GET /api/quantum/health`.
//!
//! Every request carries a fixed client-side timeout and is attempted
//! exactly once — a timed-out or failed request is reported to the
//! caller as an error, never retried.

use std::time::Duration;

use quarry_ir::Op;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{ClientError, ClientResult};
use crate::wire::{
    DiagramRequest, ExecuteRequest, ExecuteResponse, HealthResponse, HistogramRequest,
    RenderResponse,
};

/// Base URL used when `QUARRY_SERVICE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Environment variable overriding the service base URL.
pub const BASE_URL_ENV: &str = "QUARRY_SERVICE_URL";

/// Fixed total timeout for every request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for establishing the TCP connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Compute-service REST client.
///
/// Holds one connection-pooled HTTP client with the fixed request
/// timeout baked in. Cloning is cheap and shares the pool.
#[derive(Debug, Clone)]
pub struct ComputeClient {
    /// HTTP client with timeouts configured.
    client: Client,
    /// API base URL (without trailing slash).
    base_url: String,
}

impl ComputeClient {
    /// Create a client from the environment.
    ///
    /// Reads the base URL from `QUARRY_SERVICE_URL`, falling back to
    /// [`DEFAULT_BASE_URL`].
    pub fn new() -> ClientResult<Self> {
        let base_url =
            std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(base_url)
    }

    /// Create a client targeting a specific base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_timeout(base_url, REQUEST_TIMEOUT)
    }

    /// Create a client with a non-default request timeout.
    ///
    /// Production callers should use [`ComputeClient::with_base_url`];
    /// this exists so tests can exercise the timeout path quickly.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(ClientError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform a POST request with a JSON body, returning the
    /// deserialized JSON body.
    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> ClientResult<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("POST {}", url);

        let resp = self.client.post(&url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    /// Perform a GET request, returning the deserialized JSON body.
    async fn get<T: for<'de> Deserialize<'de>>(&self, path: &str) -> ClientResult<T> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!("GET {}", url);

        let resp = self.client.get(&url).send().await?;
        Self::handle_response(resp).await
    }

    /// Handle an HTTP response: deserialize JSON or return an error.
    async fn handle_response<T: for<'de> Deserialize<'de>>(
        response: reqwest::Response,
    ) -> ClientResult<T> {
        let status = response.status();

        if status.is_success() {
            let body = response.json().await?;
            Ok(body)
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(ClientError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }

    // -----------------------------------------------------------------------
    // Public API methods
    // -----------------------------------------------------------------------

    /// Execute an accumulated program with the given shot count.
    #[instrument(skip(self, req), fields(ops = req.operations.len(), shots = req.shots))]
    pub async fn execute(&self, req: &ExecuteRequest) -> ClientResult<ExecuteResponse> {
        debug!("Submitting program for execution");
        self.post("api/quantum/execute", req).await
    }

    /// Render a histogram artifact from raw result text.
    #[instrument(skip(self, data))]
    pub async fn render_histogram(&self, data: &str) -> ClientResult<RenderResponse> {
        debug!("Requesting histogram render");
        self.post(
            "api/visualization/histogram",
            &HistogramRequest {
                data: data.to_string(),
            },
        )
        .await
    }

    /// Render a circuit-diagram artifact from a program snapshot.
    #[instrument(skip(self, operations), fields(ops = operations.len()))]
    pub async fn render_diagram(&self, operations: &[Op]) -> ClientResult<RenderResponse> {
        debug!("Requesting circuit-diagram render");
        self.post(
            "api/visualization/circuit",
            &DiagramRequest {
                operations: operations.to_vec(),
            },
        )
        .await
    }

    /// Probe the service liveness endpoint.
    #[instrument(skip(self))]
    pub async fn health(&self) -> ClientResult<HealthResponse> {
        self.get("api/quantum/health").await
    }
}
