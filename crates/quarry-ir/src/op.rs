//! Circuit operations in block wire format.

use serde::{Deserialize, Serialize};

/// A single operation in a block-built circuit.
///
/// Operations are immutable once constructed: a program grows by
/// appending new operations, never by editing old ones. The enum
/// serializes with `"op"` as the internal tag field, which is the JSON
/// shape the compute service accepts:
///
/// ```json
/// {"op": "create_circuit", "qubits": 2, "bits": 2}
/// {"op": "h", "qubit": 0}
/// {"op": "cx", "control": 0, "target": 1}
/// {"op": "measure_all"}
/// ```
///
/// Qubit and bit indices are **not** range-checked against the most
/// recent [`Op::CreateCircuit`]; the compute service owns that policy
/// and reports violations as execution errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Op {
    /// Allocate a fresh circuit with the given register sizes.
    ///
    /// Must be the first operation of a runnable program. Register
    /// sizes are forwarded to the service as-is.
    CreateCircuit {
        /// Number of qubits.
        qubits: u32,
        /// Number of classical bits.
        bits: u32,
    },

    /// Hadamard gate.
    H {
        /// Target qubit index (0-based).
        qubit: u32,
    },

    /// Pauli-X gate.
    X {
        /// Target qubit index (0-based).
        qubit: u32,
    },

    /// Pauli-Y gate.
    Y {
        /// Target qubit index (0-based).
        qubit: u32,
    },

    /// Pauli-Z gate.
    Z {
        /// Target qubit index (0-based).
        qubit: u32,
    },

    /// Controlled-X (CNOT) gate.
    Cx {
        /// Control qubit index (0-based).
        control: u32,
        /// Target qubit index (0-based).
        target: u32,
    },

    /// Projective measurement of every qubit into the classical bits.
    MeasureAll,
}

impl Op {
    /// Get the wire name of the operation.
    pub fn name(&self) -> &'static str {
        match self {
            Op::CreateCircuit { .. } => "create_circuit",
            Op::H { .. } => "h",
            Op::X { .. } => "x",
            Op::Y { .. } => "y",
            Op::Z { .. } => "z",
            Op::Cx { .. } => "cx",
            Op::MeasureAll => "measure_all",
        }
    }

    /// Check if this is the structural create operation.
    pub fn is_create(&self) -> bool {
        matches!(self, Op::CreateCircuit { .. })
    }

    /// Check if this is a gate (not create, not measurement).
    pub fn is_gate(&self) -> bool {
        matches!(
            self,
            Op::H { .. } | Op::X { .. } | Op::Y { .. } | Op::Z { .. } | Op::Cx { .. }
        )
    }

    /// Check if this is a measurement.
    pub fn is_measure(&self) -> bool {
        matches!(self, Op::MeasureAll)
    }
}
