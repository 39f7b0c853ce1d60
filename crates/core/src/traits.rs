use super::csr::WeightedDigraph;
use common::{
    error::Error,
    types::{ArbitrageCycle, Instrument},
};

/// Trait for graph solvers capable of detecting negative cycles.
pub trait GraphSolver {
    /// Detects a negative cycle reachable from `start`.
    ///
    /// Returns `Ok(Some(cycle))` if a negative cycle is found,
    /// `Ok(None)` if none exists, or `Err(e)` on failure.
    fn find_negative_cycle(
        &self,
        graph: &WeightedDigraph,
        start: Instrument,
    ) -> Result<Option<ArbitrageCycle>, Error>;
}
