//! Quarry Compute-Service Client
//!
//! HTTP client for the remote service that executes block-built
//! circuits and renders result artifacts. The protocol is three POST
//! endpoints and a liveness probe:
//!
//! | Endpoint | Body | Response |
//! |----------|------|----------|
//! | `POST /api/quantum/execute` | `{operations, shots}` | `{success, result_text?, counts?, error?}` |
//! | `POST /api/visualization/histogram` | `{data}` | `{success, image_base64?, error?}` |
//! | `POST /api/visualization/circuit` | `{operations}` | `{success, image_base64?, error?}` |
//! | `GET /api/quantum/health` | — | `{status, service?}` |
//!
//! All requests carry a fixed 30-second timeout and are never retried;
//! a failure is the caller's to absorb.
//!
//! The [`ComputeService`] trait is the seam consumed by the runtime:
//! [`ComputeClient`] implements it over HTTP, and tests implement it
//! in-memory.
//!
//! # Example
//!
//! ```ignore
//! use quarry_client::{ComputeClient, ExecuteRequest};
//! use quarry_ir::Program;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = ComputeClient::new()?;
//!
//! let mut program = Program::new();
//! program.create(2, 2);
//! program.h(0).cx(0, 1).measure_all();
//!
//! let resp = client
//!     .execute(&ExecuteRequest::new(program.ops().to_vec(), 1000))
//!     .await?;
//! println!("{}", resp.text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod error;
pub mod service;
pub mod wire;

pub use api::{BASE_URL_ENV, ComputeClient, DEFAULT_BASE_URL, REQUEST_TIMEOUT};
pub use error::{ClientError, ClientResult};
pub use service::ComputeService;
pub use wire::{
    DiagramRequest, ExecuteRequest, ExecuteResponse, HealthResponse, HistogramRequest,
    RenderResponse,
};
