use thiserror::Error;

use crate::types::Instrument;

/// First offending entry found while validating a rate matrix (row-major scan).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixDefect {
    #[error("matrix has no rows")]
    Empty,

    #[error("row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("rate {from} -> {to} is not finite")]
    NonFinite { from: Instrument, to: Instrument },

    #[error("rate {from} -> {to} is {rate}, rates must be strictly positive")]
    NonPositive {
        from: Instrument,
        to: Instrument,
        rate: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The rate matrix cannot be turned into a graph.
    #[error("Invalid rate matrix: {0}")]
    InvalidMatrix(#[from] MatrixDefect),

    /// The requested start vertex is not part of the graph.
    #[error("Start vertex {start} is not in a graph of {num_nodes} nodes.")]
    InvalidStartVertex { start: Instrument, num_nodes: usize },

    /// Predecessor chain ended (or ran past |V| steps) before a vertex repeated.
    #[error("Cycle reconstruction failed: broken predecessor chain at vertex {vertex}.")]
    ReconstructionFailure { vertex: Instrument },

    /// Indicates an attempt to access a node index that exceeds the graph size (N).
    #[error("Node index {0} is out of bounds.")]
    NodeIndexOutOfBounds(usize),
}
