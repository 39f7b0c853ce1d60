use super::csr::WeightedDigraph;
use super::traits::GraphSolver;
use common::{
    error::Error,
    types::{ArbitrageCycle, Instrument},
};
use tracing::{debug, trace};

/// Weight below which a cycle sum counts as negative. Consistent markets
/// sum to zero only up to floating-point rounding.
pub const NEGATIVE_CYCLE_EPSILON: f64 = 1e-12;

/// Single-source Bellman-Ford solver with negative cycle reconstruction.
///
/// Runs exactly |V| - 1 full relaxation rounds over the edges in index
/// order, then one detection pass. Only strict improvements relax, so the
/// result is deterministic for a given graph and start vertex.
pub struct BellmanFordSolver;

impl BellmanFordSolver {
    /// Reconstructs the negative cycle behind a still-relaxable edge.
    ///
    /// `violating` is the target of that edge. It may sit downstream of the
    /// cycle rather than on it, so predecessors are walked back until a
    /// vertex repeats; the repeated vertex is on the cycle. The cycle is then
    /// collected backwards from there and reversed into trade order.
    ///
    /// # Arguments
    /// * `violating` - Target of the edge that still relaxed after |V| - 1 rounds.
    /// * `pred_edge_idx` - Edge index that last improved each node, or `None`.
    /// * `graph` - The graph the predecessor table was built over.
    ///
    /// # Errors
    /// `Error::ReconstructionFailure` if a `None` predecessor is reached before
    /// a vertex repeats. Under correct relaxation this cannot happen.
    pub fn reconstruct_cycle(
        &self,
        violating: Instrument,
        pred_edge_idx: &[Option<usize>],
        graph: &WeightedDigraph,
    ) -> Result<ArbitrageCycle, Error> {
        let num_nodes = graph.num_nodes();
        if violating >= num_nodes || pred_edge_idx.len() != num_nodes {
            return Err(Error::ReconstructionFailure { vertex: violating });
        }

        let pred_source = |node: Instrument| -> Result<(usize, Instrument), Error> {
            pred_edge_idx[node]
                .and_then(|edge_idx| graph.edge(edge_idx).map(|(u, _, _)| (edge_idx, u)))
                .ok_or(Error::ReconstructionFailure { vertex: node })
        };

        // Every step marks a new vertex, so a repeat shows up within |V| steps.
        let mut visited = vec![false; num_nodes];
        let mut trace_node = violating;
        while !visited[trace_node] {
            visited[trace_node] = true;
            trace_node = pred_source(trace_node)?.1;
        }

        let cycle_start_node = trace_node;
        let mut cycle_edge_indices: Vec<usize> = Vec::new();
        let mut current_node = cycle_start_node;

        loop {
            if cycle_edge_indices.len() == num_nodes {
                return Err(Error::ReconstructionFailure {
                    vertex: current_node,
                });
            }

            let (edge_idx, source_node) = pred_source(current_node)?;
            cycle_edge_indices.push(edge_idx);
            current_node = source_node;

            if current_node == cycle_start_node {
                break;
            }
        }

        cycle_edge_indices.reverse();

        let len = cycle_edge_indices.len();
        let mut instruments = Vec::with_capacity(len);
        let mut rates = Vec::with_capacity(len);
        let mut total_weight = 0.0f64;

        for &edge_idx in &cycle_edge_indices {
            let (u, _, weight) = graph
                .edge(edge_idx)
                .ok_or(Error::ReconstructionFailure { vertex: current_node })?;
            let rate = graph
                .edge_rate(edge_idx)
                .ok_or(Error::ReconstructionFailure { vertex: u })?;

            instruments.push(u);
            rates.push(rate);
            total_weight += weight;
        }

        Ok(ArbitrageCycle {
            instruments,
            rates,
            total_weight,
        })
    }
}

impl GraphSolver for BellmanFordSolver {
    /// Finds a negative cycle reachable from `start`.
    ///
    /// # Returns
    /// - `Ok(Some(cycle))` → Profitable cycle found.
    /// - `Ok(None)` → No negative cycle reachable from `start`.
    /// - `Err(e)` → `start` is not a vertex, or reconstruction broke.
    fn find_negative_cycle(
        &self,
        graph: &WeightedDigraph,
        start: Instrument,
    ) -> Result<Option<ArbitrageCycle>, Error> {
        let num_nodes = graph.num_nodes();
        if !graph.contains(start) {
            return Err(Error::InvalidStartVertex { start, num_nodes });
        }

        let mut distance = vec![f64::INFINITY; num_nodes];
        distance[start] = 0.0;

        // Stores the edge index that last improved each node.
        let mut pred_edge_idx: Vec<Option<usize>> = vec![None; num_nodes];

        // No early exit: the detection pass below relies on all |V| - 1 rounds.
        for round in 1..num_nodes {
            let mut relaxed = 0usize;
            for (edge_idx, (u, v, weight)) in graph.edges().enumerate() {
                if distance[u].is_finite() && distance[u] + weight < distance[v] {
                    distance[v] = distance[u] + weight;
                    pred_edge_idx[v] = Some(edge_idx);
                    relaxed += 1;
                }
            }
            trace!(round, relaxed, "relaxation round finished");
        }

        // Rounding in -ln leaves consistent cycles a few ulps below zero, so
        // only improvements beyond the tolerance count as violations.
        for (edge_idx, (u, v, weight)) in graph.edges().enumerate() {
            if distance[u].is_finite()
                && distance[u] + weight < distance[v] - NEGATIVE_CYCLE_EPSILON
            {
                debug!(from = u, to = v, "edge still relaxable, negative cycle reachable");

                // Record the violating edge so the walk always leaves `v`;
                // for a negative self-loop on `start` this is its only predecessor.
                pred_edge_idx[v] = Some(edge_idx);
                let cycle = self.reconstruct_cycle(v, &pred_edge_idx, graph)?;
                if cycle.total_weight < -NEGATIVE_CYCLE_EPSILON {
                    return Ok(Some(cycle));
                }
                trace!(total_weight = cycle.total_weight, "skipping zero-weight cycle");
            }
        }

        debug!(start, "no negative cycle reachable");
        Ok(None)
    }
}
