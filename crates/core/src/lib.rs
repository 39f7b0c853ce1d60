//! Negative-cycle (arbitrage) detection over exchange-rate matrices.
//!
//! A [`RateMatrix`] becomes a [`WeightedDigraph`] with `-ln(rate)` weights,
//! and a [`GraphSolver`] looks for a negative cycle reachable from a start
//! instrument. Everything here is synchronous and owns its own state per call.

pub mod builder;
pub mod csr;
pub mod solver;
pub mod traits;

pub use builder::RateGraphBuilder;
pub use csr::WeightedDigraph;
pub use solver::{BellmanFordSolver, NEGATIVE_CYCLE_EPSILON};
pub use traits::GraphSolver;

use common::error::Error;
use common::types::{ArbitrageCycle, Instrument, RateMatrix};

/// Builds the graph for `matrix` and runs [`BellmanFordSolver`] from `start`.
pub fn find_arbitrage(
    matrix: &RateMatrix,
    start: Instrument,
) -> Result<Option<ArbitrageCycle>, Error> {
    let graph = RateGraphBuilder::build(matrix)?;
    BellmanFordSolver.find_negative_cycle(&graph, start)
}
