//! The block-program accumulator.

use serde::{Deserialize, Serialize};

use crate::counts::Counts;
use crate::op::Op;

/// Prefix carried by every failure written into [`Program::result_text`].
///
/// Consumers that only poll result state branch on this prefix to tell
/// failures from results.
pub const ERROR_PREFIX: &str = "Error: ";

/// The accumulated block program plus the result state of its last run.
///
/// One `Program` is shared by every block execution in the process: gate
/// blocks append to it, the run block snapshots it, and reporter blocks
/// read the result fields. Appends are unconditional and infallible —
/// a program with no leading [`Op::CreateCircuit`] is representable and
/// is only rejected when a run is attempted.
///
/// # Example
///
/// ```rust
/// use quarry_ir::Program;
///
/// let mut program = Program::new();
/// program.create(2, 2);
/// program.h(0).cx(0, 1).measure_all();
///
/// assert!(program.has_circuit());
/// assert_eq!(program.ops().len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Accumulated operations, in append order.
    ops: Vec<Op>,
    /// Textual summary of the last run (empty until a run completes).
    result_text: String,
    /// Outcome histogram of the last successful run.
    counts: Counts,
}

impl Program {
    /// Create an empty program with no result state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh circuit with the given register sizes.
    ///
    /// Replaces the entire accumulated program with a single
    /// [`Op::CreateCircuit`] and clears the result state. Any gates
    /// appended before this call are discarded, even mid-program.
    pub fn create(&mut self, qubits: u32, bits: u32) -> &mut Self {
        self.ops.clear();
        self.ops.push(Op::CreateCircuit { qubits, bits });
        self.result_text.clear();
        self.counts.clear();
        self
    }

    /// Append an operation unconditionally.
    pub fn push(&mut self, op: Op) -> &mut Self {
        self.ops.push(op);
        self
    }

    /// Append a Hadamard gate.
    pub fn h(&mut self, qubit: u32) -> &mut Self {
        self.push(Op::H { qubit })
    }

    /// Append a Pauli-X gate.
    pub fn x(&mut self, qubit: u32) -> &mut Self {
        self.push(Op::X { qubit })
    }

    /// Append a Pauli-Y gate.
    pub fn y(&mut self, qubit: u32) -> &mut Self {
        self.push(Op::Y { qubit })
    }

    /// Append a Pauli-Z gate.
    pub fn z(&mut self, qubit: u32) -> &mut Self {
        self.push(Op::Z { qubit })
    }

    /// Append a controlled-X gate.
    pub fn cx(&mut self, control: u32, target: u32) -> &mut Self {
        self.push(Op::Cx { control, target })
    }

    /// Append a measure-everything operation.
    pub fn measure_all(&mut self) -> &mut Self {
        self.push(Op::MeasureAll)
    }

    /// The accumulated operations, in append order.
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Check the run precondition: the program is non-empty and starts
    /// with [`Op::CreateCircuit`].
    pub fn has_circuit(&self) -> bool {
        self.ops.first().is_some_and(Op::is_create)
    }

    /// Number of gate operations (excludes create and measurement).
    pub fn gate_count(&self) -> usize {
        self.ops.iter().filter(|op| op.is_gate()).count()
    }

    /// Textual result of the last run, or `""` if none.
    pub fn result_text(&self) -> &str {
        &self.result_text
    }

    /// Outcome histogram of the last successful run.
    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    /// Record a successful run.
    pub fn record_success(&mut self, text: impl Into<String>, counts: Counts) {
        self.result_text = text.into();
        self.counts = counts;
    }

    /// Record a failed run.
    ///
    /// Writes `reason` into the result text behind [`ERROR_PREFIX`] and
    /// clears the counts: polling consumers never see a fresh error
    /// paired with a stale histogram.
    pub fn record_failure(&mut self, reason: impl AsRef<str>) {
        self.result_text = format!("{ERROR_PREFIX}{}", reason.as_ref());
        self.counts.clear();
    }
}
