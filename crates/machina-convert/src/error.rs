//! Error types for the conversion pipeline.

use machina_core::{MachineError, NodeId};
use thiserror::Error;

/// Result type alias for conversion operations.
pub type ConvertResult<T> = Result<T, ConvertError>;

/// Errors that can occur while converting, minimizing or persisting machines.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// An operation requiring a start node was invoked on a machine without one.
    #[error("automaton has no start node")]
    InvalidAutomaton,

    /// Minimization was invoked on input violating the determinism
    /// precondition. Detection is best-effort, not guaranteed.
    #[error("input is not deterministic: node {node:?} has multiple transitions on {symbol:?}")]
    NonDeterministicInput { node: NodeId, symbol: String },

    /// A decoded transition record references a node index absent from the
    /// node list.
    #[error("decoded transition references unknown node index {index}")]
    SerializationMismatch { index: u32 },

    /// A core graph mutation failed while materializing an output machine.
    #[error("machine mutation failed: {0}")]
    Machine(#[from] MachineError),

    /// File operation failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Record (de)serialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
