//! Quarry Workbench Runtime
//!
//! The engine-side core of the block-programming quantum workbench.
//! Many independently scheduled block executions cooperate on one
//! shared circuit: gate blocks append operations, the run block ships
//! the accumulated program to a remote compute service, and reporter
//! blocks poll the reconciled result state. A separate handshake turns
//! rendered artifacts (histograms, circuit diagrams) into events that a
//! viewer displays and dismisses while the requesting block execution
//! stays suspended.
//!
//! # The protocol
//!
//! ```text
//!   block executions ──append──→ [ shared Program ]
//!                                       │ run(shots)
//!                                       ▼
//!                              snapshot + POST execute
//!                                       │
//!                     reconcile success/error into result state
//!                                       │
//!   reporter blocks ──result_text / result_data──┘
//!
//!   show_histogram / show_circuit ──POST render──→ artifact
//!        │                                            │
//!        └──── suspended ◄── VisualizationEvent ──────┘
//!                  ▲                │
//!                  └── dismiss() ── viewer
//! ```
//!
//! Nothing here returns an error to a block execution — the calling
//! contexts have no structured error handling, so every failure is
//! absorbed into a tagged outcome ([`RunOutcome`], [`VizOutcome`]) and
//! projected into the shared result text behind the `Error: ` prefix.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use quarry_client::ComputeClient;
//! use quarry_runtime::{DataShape, Workbench};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let bench = Workbench::new(Arc::new(ComputeClient::new()?));
//!
//! bench.create_circuit(2, 2);
//! bench.gate_h(0);
//! bench.gate_cx(0, 1);
//! bench.measure_all();
//!
//! bench.run(1000).await;
//! println!("{}", bench.result_text());
//! println!("{}", bench.result_data(DataShape::Counts));
//! # Ok(())
//! # }
//! ```

pub mod event;
pub mod outcome;
pub mod workbench;

pub use event::{Artifact, ArtifactKind, DismissTicket, VisualizationEvent};
pub use outcome::{DataShape, RunOutcome, VizOutcome};
pub use workbench::{NO_CIRCUIT_REASON, Workbench};

// Re-export the transport seam so embedders can construct a workbench
// without naming the client crate.
pub use quarry_client::ComputeService;
