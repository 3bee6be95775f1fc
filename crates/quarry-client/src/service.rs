//! The transport seam between the runtime and the compute service.

use async_trait::async_trait;
use quarry_ir::Op;

use crate::api::ComputeClient;
use crate::error::ClientResult;
use crate::wire::{ExecuteRequest, ExecuteResponse, RenderResponse};

/// The three remote calls the runtime core depends on.
///
/// The runtime never talks HTTP directly — it holds a
/// `dyn ComputeService` and leaves endpoint shapes, timeouts, and
/// status handling to the implementation. [`ComputeClient`] is the
/// production implementation; tests substitute in-memory mocks.
#[async_trait]
pub trait ComputeService: Send + Sync {
    /// Execute an accumulated program remotely.
    async fn execute(&self, req: &ExecuteRequest) -> ClientResult<ExecuteResponse>;

    /// Render a histogram artifact from raw result text.
    async fn render_histogram(&self, data: &str) -> ClientResult<RenderResponse>;

    /// Render a circuit-diagram artifact from a program snapshot.
    async fn render_diagram(&self, operations: &[Op]) -> ClientResult<RenderResponse>;
}

#[async_trait]
impl ComputeService for ComputeClient {
    async fn execute(&self, req: &ExecuteRequest) -> ClientResult<ExecuteResponse> {
        ComputeClient::execute(self, req).await
    }

    async fn render_histogram(&self, data: &str) -> ClientResult<RenderResponse> {
        ComputeClient::render_histogram(self, data).await
    }

    async fn render_diagram(&self, operations: &[Op]) -> ClientResult<RenderResponse> {
        ComputeClient::render_diagram(self, operations).await
    }
}
