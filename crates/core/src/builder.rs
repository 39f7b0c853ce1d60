use common::error::Error;
use common::types::{Edge, RateMatrix};
use tracing::debug;

use super::csr::WeightedDigraph;

/// Turns an exchange-rate matrix into the `-ln(rate)` weighted graph.
pub struct RateGraphBuilder;

impl RateGraphBuilder {
    /// Builds one edge `i -> j` with weight `-ln(matrix[i][j])` for every
    /// ordered pair, self-loops included, in row-major order.
    ///
    /// # Errors
    /// `Error::InvalidMatrix` if the matrix is empty, not square, or holds
    /// a non-positive, infinite or NaN rate.
    pub fn build(matrix: &RateMatrix) -> Result<WeightedDigraph, Error> {
        let num_nodes = matrix.validate()?;

        let edges: Vec<Edge> = matrix
            .rows()
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().enumerate().map(move |(j, &rate)| (i, j, rate)))
            .collect();

        debug!(num_nodes, num_edges = edges.len(), "built rate graph");

        // Row-major edges are already grouped by source.
        Ok(WeightedDigraph::from_sorted_edges(num_nodes, &edges))
    }
}
