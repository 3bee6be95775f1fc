//! Protocol tests for the workbench: accumulation, execution
//! reconciliation, and the visualization handshake.
//!
//! These tests drive the runtime through scripted in-memory compute
//! services; one test exercises the real HTTP client against a silent
//! listener to prove the bounded wait end to end.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use quarry_client::{
    ClientError, ClientResult, ComputeClient, ComputeService, ExecuteRequest, ExecuteResponse,
    RenderResponse,
};
use quarry_ir::Op;
use quarry_runtime::{ArtifactKind, DataShape, RunOutcome, VizOutcome, Workbench};

/// One scripted reply from the mock service.
enum Script {
    /// Respond with this JSON body.
    Json(&'static str),
    /// Fail as a timed-out transport call.
    Timeout,
}

/// Scripted compute service that records every request it receives.
#[derive(Default)]
struct MockService {
    execute_scripts: Mutex<VecDeque<Script>>,
    render_scripts: Mutex<VecDeque<Script>>,
    executed: Mutex<Vec<ExecuteRequest>>,
    histogram_payloads: Mutex<Vec<String>>,
    diagram_payloads: Mutex<Vec<Vec<Op>>>,
}

impl MockService {
    fn new(
        execute: impl IntoIterator<Item = Script>,
        render: impl IntoIterator<Item = Script>,
    ) -> Arc<Self> {
        Arc::new(Self {
            execute_scripts: Mutex::new(execute.into_iter().collect()),
            render_scripts: Mutex::new(render.into_iter().collect()),
            ..Self::default()
        })
    }

    fn executed(&self) -> Vec<ExecuteRequest> {
        self.executed.lock().unwrap().clone()
    }

    fn next(scripts: &Mutex<VecDeque<Script>>, kind: &str) -> Script {
        scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected {kind} call"))
    }
}

#[async_trait]
impl ComputeService for MockService {
    async fn execute(&self, req: &ExecuteRequest) -> ClientResult<ExecuteResponse> {
        self.executed.lock().unwrap().push(req.clone());
        match Self::next(&self.execute_scripts, "execute") {
            Script::Json(body) => Ok(serde_json::from_str(body).unwrap()),
            Script::Timeout => Err(ClientError::Timeout("execute".into())),
        }
    }

    async fn render_histogram(&self, data: &str) -> ClientResult<RenderResponse> {
        self.histogram_payloads.lock().unwrap().push(data.to_string());
        match Self::next(&self.render_scripts, "render") {
            Script::Json(body) => Ok(serde_json::from_str(body).unwrap()),
            Script::Timeout => Err(ClientError::Timeout("render".into())),
        }
    }

    async fn render_diagram(&self, operations: &[Op]) -> ClientResult<RenderResponse> {
        self.diagram_payloads.lock().unwrap().push(operations.to_vec());
        match Self::next(&self.render_scripts, "render") {
            Script::Json(body) => Ok(serde_json::from_str(body).unwrap()),
            Script::Timeout => Err(ClientError::Timeout("render".into())),
        }
    }
}

const BELL_SUCCESS: &str = r#"{
    "success": true,
    "result_text": "00: 50, 11:50",
    "counts": {"00": 50, "11": 50}
}"#;

const RENDER_OK: &str = r#"{"success": true, "image_base64": "aW1hZ2U="}"#;

// ---------------------------------------------------------------------------
// Accumulation and execution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn execute_payload_preserves_append_order() {
    let service = MockService::new([Script::Json(BELL_SUCCESS)], []);
    let bench = Workbench::new(service.clone());

    bench.create_circuit(2, 2);
    bench.gate_h(0);
    bench.gate_x(1);
    bench.gate_cx(0, 1);
    bench.measure_all();
    bench.run(100).await;

    let sent = service.executed();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].operations,
        vec![
            Op::CreateCircuit { qubits: 2, bits: 2 },
            Op::H { qubit: 0 },
            Op::X { qubit: 1 },
            Op::Cx {
                control: 0,
                target: 1
            },
            Op::MeasureAll,
        ]
    );
    assert_eq!(sent[0].shots, 100);
}

#[tokio::test]
async fn create_discards_prior_gates() {
    let service = MockService::new([Script::Json(BELL_SUCCESS)], []);
    let bench = Workbench::new(service.clone());

    bench.create_circuit(2, 2);
    bench.gate_h(0);
    bench.gate_cx(0, 1);
    bench.create_circuit(3, 3);
    bench.run(10).await;

    let sent = service.executed();
    assert_eq!(
        sent[0].operations,
        vec![Op::CreateCircuit { qubits: 3, bits: 3 }]
    );
}

#[tokio::test]
async fn run_without_circuit_never_touches_the_network() {
    let service = MockService::new([], []);
    let bench = Workbench::new(service.clone());

    let outcome = bench.run(100).await;

    assert_eq!(outcome, RunOutcome::NoCircuit);
    assert!(service.executed().is_empty());
    assert_eq!(
        bench.result_text(),
        "Error: create a circuit before running"
    );
}

#[tokio::test]
async fn run_with_gate_before_create_is_rejected_locally() {
    let service = MockService::new([], []);
    let bench = Workbench::new(service.clone());

    // Gate appended without a create: representable, but not runnable.
    bench.gate_h(0);
    let outcome = bench.run(100).await;

    assert_eq!(outcome, RunOutcome::NoCircuit);
    assert!(service.executed().is_empty());
    assert!(bench.result_text().starts_with("Error: "));
}

#[tokio::test]
async fn success_response_reconciles_text_and_counts() {
    let service = MockService::new([Script::Json(BELL_SUCCESS)], []);
    let bench = Workbench::new(service);

    bench.create_circuit(2, 2);
    bench.measure_all();
    let outcome = bench.run(100).await;

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(bench.result_text(), "00: 50, 11:50");
    assert_eq!(bench.result_data(DataShape::Counts), r#"{"00":50,"11":50}"#);
    assert_eq!(bench.result_data(DataShape::Text), "00: 50, 11:50");
}

#[tokio::test]
async fn remote_failure_records_error_and_clears_counts() {
    let service = MockService::new(
        [
            Script::Json(BELL_SUCCESS),
            Script::Json(r#"{"success": false, "error": "qubit index out of range"}"#),
        ],
        [],
    );
    let bench = Workbench::new(service);

    bench.create_circuit(2, 2);
    bench.measure_all();
    bench.run(100).await;
    assert!(!bench.result_data(DataShape::Counts).eq("{}"));

    let outcome = bench.run(100).await;
    assert_eq!(
        outcome,
        RunOutcome::Rejected("qubit index out of range".into())
    );
    assert!(bench.result_text().starts_with("Error: "));
    assert!(bench.result_text().contains("qubit index out of range"));
    // Stale counts from the earlier success are gone.
    assert_eq!(bench.result_data(DataShape::Counts), "{}");
}

#[tokio::test]
async fn transport_failure_is_absorbed_into_result_state() {
    let service = MockService::new([Script::Timeout], []);
    let bench = Workbench::new(service);

    bench.create_circuit(1, 1);
    bench.measure_all();
    let outcome = bench.run(100).await;

    assert!(matches!(outcome, RunOutcome::Unreachable(_)));
    assert!(bench.result_text().starts_with("Error: "));
    assert_eq!(bench.result_data(DataShape::Counts), "{}");
}

#[tokio::test]
async fn run_completes_within_the_transport_timeout_bound() {
    // A listener that accepts the connection and then says nothing.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let _conn = listener.accept();
        std::thread::sleep(Duration::from_secs(10));
    });

    let client =
        ComputeClient::with_timeout(format!("http://{addr}"), Duration::from_millis(200)).unwrap();
    let bench = Workbench::new(Arc::new(client));

    bench.create_circuit(1, 1);
    bench.measure_all();

    // The run must resolve well inside the harness bound below; the
    // client's own timeout is the only thing stopping it.
    let outcome = tokio::time::timeout(Duration::from_secs(5), bench.run(10))
        .await
        .expect("run did not complete within the timeout bound");

    assert!(matches!(outcome, RunOutcome::Unreachable(_)));
    assert!(bench.result_text().starts_with("Error: "));
}

#[tokio::test]
async fn bell_pair_scenario() {
    let service = MockService::new(
        [Script::Json(r#"{"success": true, "result_text": "00:512,11:488"}"#)],
        [],
    );
    let bench = Workbench::new(service.clone());

    bench.create_circuit(2, 2);
    bench.gate_h(0);
    bench.gate_cx(0, 1);
    bench.measure_all();
    let outcome = bench.run(1000).await;

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(bench.result_text(), "00:512,11:488");
    // No counts in the response: the histogram is empty, not stale.
    assert_eq!(bench.result_data(DataShape::Counts), "{}");
    assert_eq!(service.executed()[0].shots, 1000);
}

#[tokio::test]
async fn clones_share_one_accumulator() {
    let service = MockService::new([Script::Json(BELL_SUCCESS)], []);
    let bench = Workbench::new(service.clone());

    // Two handles interleaving appends, as two block threads would.
    let other = bench.clone();
    bench.create_circuit(2, 2);
    other.gate_h(0);
    bench.gate_cx(0, 1);
    other.run(50).await;

    let sent = service.executed();
    assert_eq!(sent[0].operations.len(), 3);
    assert_eq!(sent[0].operations[1], Op::H { qubit: 0 });
}

// ---------------------------------------------------------------------------
// Visualization handshake
// ---------------------------------------------------------------------------

#[tokio::test]
async fn histogram_suspends_until_viewer_dismisses() {
    let service = MockService::new([], [Script::Json(RENDER_OK)]);
    let bench = Workbench::new(service);
    let mut viewer = bench.attach_viewer();

    let requester = {
        let bench = bench.clone();
        tokio::spawn(async move { bench.show_histogram("00: 512, 11: 488").await })
    };

    let event = viewer.recv().await.expect("no visualization event raised");
    assert_eq!(event.artifact.kind, ArtifactKind::Histogram);
    assert_eq!(event.artifact.image_base64, "aW1hZ2U=");

    // The requester is still suspended while the ticket is held.
    let mut requester = requester;
    let still_pending =
        tokio::time::timeout(Duration::from_millis(50), &mut requester).await;
    assert!(still_pending.is_err(), "requester resumed before dismissal");

    event.ticket.dismiss();
    let outcome = requester.await.unwrap();
    assert_eq!(outcome, VizOutcome::Dismissed);
}

#[tokio::test]
async fn dropped_ticket_resumes_the_requester() {
    let service = MockService::new([], [Script::Json(RENDER_OK)]);
    let bench = Workbench::new(service);
    let mut viewer = bench.attach_viewer();

    let requester = {
        let bench = bench.clone();
        tokio::spawn(async move { bench.show_histogram("00: 1").await })
    };

    let event = viewer.recv().await.unwrap();
    drop(event);

    let outcome = tokio::time::timeout(Duration::from_secs(1), requester)
        .await
        .expect("requester hung after viewer dropped the ticket")
        .unwrap();
    assert_eq!(outcome, VizOutcome::Dismissed);
}

#[tokio::test]
async fn handshake_without_viewer_resolves_immediately() {
    let service = MockService::new([], [Script::Json(RENDER_OK)]);
    let bench = Workbench::new(service);

    let outcome = tokio::time::timeout(Duration::from_secs(1), bench.show_histogram("00: 1"))
        .await
        .expect("handshake hung with no viewer attached");
    assert_eq!(outcome, VizOutcome::Dismissed);
}

#[tokio::test]
async fn empty_histogram_payload_is_skipped_before_any_network_call() {
    let service = MockService::new([], []);
    let bench = Workbench::new(service.clone());
    let mut viewer = bench.attach_viewer();

    let outcome = bench.show_histogram("   ").await;

    assert_eq!(outcome, VizOutcome::NothingToShow);
    assert!(service.histogram_payloads.lock().unwrap().is_empty());
    assert!(viewer.try_recv().is_err());
}

#[tokio::test]
async fn empty_circuit_is_skipped_before_any_network_call() {
    let service = MockService::new([], []);
    let bench = Workbench::new(service.clone());

    let outcome = bench.show_circuit().await;

    assert_eq!(outcome, VizOutcome::NothingToShow);
    assert!(service.diagram_payloads.lock().unwrap().is_empty());
}

#[tokio::test]
async fn render_failure_raises_no_event() {
    let service = MockService::new(
        [],
        [Script::Json(r#"{"success": false, "error": "unparseable data"}"#)],
    );
    let bench = Workbench::new(service);
    let mut viewer = bench.attach_viewer();

    let outcome = bench.show_histogram("not a distribution").await;

    assert_eq!(outcome, VizOutcome::Failed("unparseable data".into()));
    assert!(viewer.try_recv().is_err());
}

#[tokio::test]
async fn render_without_artifact_is_a_failure() {
    let service = MockService::new([], [Script::Json(r#"{"success": true}"#)]);
    let bench = Workbench::new(service);
    let mut viewer = bench.attach_viewer();

    let outcome = bench.show_histogram("00: 1").await;

    assert!(matches!(outcome, VizOutcome::Failed(_)));
    assert!(viewer.try_recv().is_err());
}

#[tokio::test]
async fn render_transport_failure_completes_quietly() {
    let service = MockService::new([], [Script::Timeout]);
    let bench = Workbench::new(service);

    let outcome = bench.show_histogram("00: 1").await;
    assert!(matches!(outcome, VizOutcome::Failed(_)));
    // Result state is untouched by visualization failures.
    assert_eq!(bench.result_text(), "");
}

#[tokio::test]
async fn circuit_diagram_carries_the_full_program() {
    let service = MockService::new([], [Script::Json(RENDER_OK)]);
    let bench = Workbench::new(service.clone());
    let mut viewer = bench.attach_viewer();

    bench.create_circuit(2, 2);
    bench.gate_h(0);
    bench.gate_cx(0, 1);

    let requester = {
        let bench = bench.clone();
        tokio::spawn(async move { bench.show_circuit().await })
    };

    let event = viewer.recv().await.unwrap();
    assert_eq!(event.artifact.kind, ArtifactKind::CircuitDiagram);
    event.ticket.dismiss();
    requester.await.unwrap();

    let diagrams = service.diagram_payloads.lock().unwrap();
    assert_eq!(
        diagrams[0],
        vec![
            Op::CreateCircuit { qubits: 2, bits: 2 },
            Op::H { qubit: 0 },
            Op::Cx {
                control: 0,
                target: 1
            },
        ]
    );
}
