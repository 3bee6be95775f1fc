//! The shared circuit workbench.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use quarry_client::{ClientResult, ComputeClient, ComputeService, ExecuteRequest, RenderResponse};
use quarry_ir::{Op, Program};

use crate::event::{Artifact, ArtifactKind, DismissTicket, VisualizationEvent};
use crate::outcome::{DataShape, RunOutcome, VizOutcome};

/// Failure reason recorded when a run is attempted with no circuit.
pub const NO_CIRCUIT_REASON: &str = "create a circuit before running";

/// Handle to the process-wide circuit workbench.
///
/// The workbench owns the one shared [`Program`] that every block
/// execution mutates, the compute-service connection, and the viewer
/// channel for the visualization handshake. Cloning the handle is
/// cheap and every clone sees the same state — gate blocks, the run
/// block, and reporter blocks all operate on the same live program.
///
/// Mutations are serialized by a mutex, so handles may be used from
/// truly parallel tasks; interleaving between tasks is still whatever
/// the scheduler produces. Two tasks that each append gates before
/// either runs will have merged their gates into one program — that is
/// the intended sharing model, not a race to guard against.
///
/// No operation here returns an error to the caller: failures are
/// reported as [`RunOutcome`]/[`VizOutcome`] variants and mirrored into
/// the shared result text behind the `Error: ` prefix.
#[derive(Clone)]
pub struct Workbench {
    /// The shared accumulator and result state.
    program: Arc<Mutex<Program>>,
    /// Channel to the attached viewer, if any.
    viewer: Arc<Mutex<Option<mpsc::UnboundedSender<VisualizationEvent>>>>,
    /// Remote compute service.
    service: Arc<dyn ComputeService>,
}

impl Workbench {
    /// Create a workbench over the given compute service.
    pub fn new(service: Arc<dyn ComputeService>) -> Self {
        Self {
            program: Arc::new(Mutex::new(Program::new())),
            viewer: Arc::new(Mutex::new(None)),
            service,
        }
    }

    /// Create a workbench over an HTTP client configured from the
    /// environment (`QUARRY_SERVICE_URL`).
    pub fn from_env() -> ClientResult<Self> {
        Ok(Self::new(Arc::new(ComputeClient::new()?)))
    }

    /// Lock the shared program, recovering from a poisoned lock.
    ///
    /// A panic in one block execution must not wedge every other block
    /// for the rest of the process.
    fn lock(&self) -> MutexGuard<'_, Program> {
        self.program.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // -----------------------------------------------------------------------
    // Accumulator mutations (the gate blocks)
    // -----------------------------------------------------------------------

    /// Start a fresh circuit, discarding all accumulated operations and
    /// result state.
    pub fn create_circuit(&self, qubits: u32, bits: u32) {
        self.lock().create(qubits, bits);
        info!(qubits, bits, "created circuit");
    }

    /// Append a Hadamard gate.
    pub fn gate_h(&self, qubit: u32) {
        self.lock().h(qubit);
        debug!(qubit, "added H gate");
    }

    /// Append a Pauli-X gate.
    pub fn gate_x(&self, qubit: u32) {
        self.lock().x(qubit);
        debug!(qubit, "added X gate");
    }

    /// Append a Pauli-Y gate.
    pub fn gate_y(&self, qubit: u32) {
        self.lock().y(qubit);
        debug!(qubit, "added Y gate");
    }

    /// Append a Pauli-Z gate.
    pub fn gate_z(&self, qubit: u32) {
        self.lock().z(qubit);
        debug!(qubit, "added Z gate");
    }

    /// Append a controlled-X gate.
    pub fn gate_cx(&self, control: u32, target: u32) {
        self.lock().cx(control, target);
        debug!(control, target, "added CX gate");
    }

    /// Append a measure-everything operation.
    pub fn measure_all(&self) {
        self.lock().measure_all();
        debug!("added measure-all");
    }

    /// Snapshot the current program state.
    pub fn snapshot(&self) -> Program {
        self.lock().clone()
    }

    // -----------------------------------------------------------------------
    // Execution (the run block)
    // -----------------------------------------------------------------------

    /// Execute the accumulated program remotely with the given shot
    /// count, reconciling the response into the shared result state.
    ///
    /// The precondition — a non-empty program starting with a create
    /// operation — is checked locally; a violation records the fixed
    /// no-circuit message and returns without any network traffic.
    /// Otherwise the entire current program is snapshotted and posted
    /// once, with the transport's fixed timeout as the only bound on
    /// the wait.
    #[instrument(skip(self))]
    pub async fn run(&self, shots: u32) -> RunOutcome {
        let operations = {
            let mut program = self.lock();
            if !program.has_circuit() {
                program.record_failure(NO_CIRCUIT_REASON);
                warn!("run requested with no circuit");
                return RunOutcome::NoCircuit;
            }
            program.ops().to_vec()
        };

        info!(ops = operations.len(), shots, "running circuit");
        let req = ExecuteRequest::new(operations, shots);

        match self.service.execute(&req).await {
            Ok(resp) if resp.success => {
                let text = resp.text().unwrap_or_default().to_string();
                let counts = resp.counts.unwrap_or_default();
                debug!(outcomes = counts.len(), "run succeeded");
                self.lock().record_success(text, counts);
                RunOutcome::Completed
            }
            Ok(resp) => {
                let reason = resp
                    .error
                    .unwrap_or_else(|| "service reported failure without detail".to_string());
                warn!(%reason, "run rejected by service");
                self.lock().record_failure(&reason);
                RunOutcome::Rejected(reason)
            }
            Err(e) => {
                let reason = e.to_string();
                warn!(%reason, "run failed to reach service");
                self.lock().record_failure(&reason);
                RunOutcome::Unreachable(reason)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Result accessors (the reporter blocks)
    // -----------------------------------------------------------------------

    /// The textual result of the last run, or `""` if none.
    pub fn result_text(&self) -> String {
        self.lock().result_text().to_string()
    }

    /// The last run's result in the requested shape: the outcome
    /// histogram as a JSON object string, or the textual summary.
    pub fn result_data(&self, shape: DataShape) -> String {
        let program = self.lock();
        match shape {
            DataShape::Counts => program.counts().to_json(),
            DataShape::Text => program.result_text().to_string(),
        }
    }

    // -----------------------------------------------------------------------
    // Visualization handshake
    // -----------------------------------------------------------------------

    /// Attach a viewer, returning the channel on which visualization
    /// events arrive. Replaces any previously attached viewer.
    ///
    /// The viewer must call [`DismissTicket::dismiss`] on each event's
    /// ticket once the user has dismissed the artifact; until then the
    /// requesting block execution stays suspended.
    pub fn attach_viewer(&self) -> mpsc::UnboundedReceiver<VisualizationEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self
            .viewer
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(tx);
        rx
    }

    /// Render a histogram of `data` and show it to the viewer, waiting
    /// for the dismissal.
    #[instrument(skip(self, data))]
    pub async fn show_histogram(&self, data: &str) -> VizOutcome {
        if data.trim().is_empty() {
            warn!("histogram requested with no data");
            return VizOutcome::NothingToShow;
        }

        match self.service.render_histogram(data).await {
            Ok(resp) => self.present(ArtifactKind::Histogram, resp).await,
            Err(e) => {
                warn!(error = %e, "histogram render request failed");
                VizOutcome::Failed(e.to_string())
            }
        }
    }

    /// Render a diagram of the accumulated circuit and show it to the
    /// viewer, waiting for the dismissal.
    #[instrument(skip(self))]
    pub async fn show_circuit(&self) -> VizOutcome {
        let operations: Vec<Op> = self.lock().ops().to_vec();
        if operations.is_empty() {
            warn!("circuit diagram requested with no operations");
            return VizOutcome::NothingToShow;
        }

        match self.service.render_diagram(&operations).await {
            Ok(resp) => self.present(ArtifactKind::CircuitDiagram, resp).await,
            Err(e) => {
                warn!(error = %e, "circuit-diagram render request failed");
                VizOutcome::Failed(e.to_string())
            }
        }
    }

    /// Raise a visualization event for a successful render and suspend
    /// until the viewer dismisses it.
    ///
    /// Failure responses and missing artifacts complete immediately
    /// without raising an event. If no viewer is attached (or the
    /// attached viewer is gone), the handshake resolves immediately —
    /// there is nobody to wait for.
    async fn present(&self, kind: ArtifactKind, resp: RenderResponse) -> VizOutcome {
        let image_base64 = match (resp.success, resp.image_base64) {
            (true, Some(image)) => image,
            (true, None) => {
                warn!(kind = kind.name(), "render succeeded without an artifact");
                return VizOutcome::Failed("render returned no artifact".to_string());
            }
            (false, _) => {
                let reason = resp
                    .error
                    .unwrap_or_else(|| "render failed without detail".to_string());
                warn!(kind = kind.name(), %reason, "render rejected by service");
                return VizOutcome::Failed(reason);
            }
        };

        let dismissal = {
            let mut viewer = self.viewer.lock().unwrap_or_else(PoisonError::into_inner);
            match viewer.take() {
                Some(sender) => {
                    let (ticket, rx) = DismissTicket::channel();
                    let event = VisualizationEvent {
                        artifact: Artifact { kind, image_base64 },
                        ticket,
                    };
                    if sender.send(event).is_ok() {
                        *viewer = Some(sender);
                        Some(rx)
                    } else {
                        // Viewer receiver was dropped; leave the slot empty.
                        None
                    }
                }
                None => None,
            }
        };

        match dismissal {
            Some(rx) => {
                debug!(kind = kind.name(), "artifact shown, waiting for dismissal");
                // A dropped ticket resolves as Err; either way the
                // viewer is done with the artifact.
                let _ = rx.await;
                VizOutcome::Dismissed
            }
            None => {
                debug!(kind = kind.name(), "no viewer attached, resuming immediately");
                VizOutcome::Dismissed
            }
        }
    }
}

impl std::fmt::Debug for Workbench {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let program = self.lock();
        f.debug_struct("Workbench")
            .field("ops", &program.ops().len())
            .field("has_circuit", &program.has_circuit())
            .finish()
    }
}
