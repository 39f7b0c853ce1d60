use common::error::Error;
use common::types::{Edge, Instrument, check_rate};

/// Weighted directed graph in Compressed Sparse Row (CSR) format.
///
/// CSR format stores outgoing edges of each node contiguously in memory:
/// - `node_pointers[u]..node_pointers[u+1]` → edges from node `u`
/// - `edge_targets[i]` -> target node of edge `i`
/// - `edge_weights[i]` -> weight `-ln(rate)` of edge `i`
/// - `edge_rates[i]` -> original rate of edge `i`
/// - `edge_source_by_index[i]` -> source node of edge `i`
///
/// Edge index order is the relaxation order used by the solvers. For a
/// graph built from a rate matrix it is row-major `(i, j)` order.
///
/// The graph is immutable once built; a changed rate means a new graph.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedDigraph {
    pub(crate) num_nodes: usize,
    pub(crate) node_pointers: Vec<usize>,
    pub(crate) edge_targets: Vec<Instrument>,
    pub(crate) edge_weights: Vec<f64>,
    pub(crate) edge_rates: Vec<f64>,
    pub(crate) edge_source_by_index: Vec<Instrument>,
}

impl WeightedDigraph {
    /// Creates a graph from a list of edges `(src, dst, rate)`.
    ///
    /// Each edge weight is transformed as `-ln(rate)`. Edges are stably
    /// sorted by source node, so edges sharing a source keep their input order.
    ///
    /// # Errors
    /// `Error::NodeIndexOutOfBounds` for an endpoint `>= num_nodes`,
    /// `Error::InvalidMatrix` for a non-positive or non-finite rate.
    pub fn from_edges(num_nodes: usize, edges: &[Edge]) -> Result<Self, Error> {
        for &(u, v, rate) in edges {
            if u >= num_nodes {
                return Err(Error::NodeIndexOutOfBounds(u));
            }
            if v >= num_nodes {
                return Err(Error::NodeIndexOutOfBounds(v));
            }
            check_rate(u, v, rate)?;
        }

        let mut sorted = edges.to_vec();
        sorted.sort_by_key(|&(src, _, _)| src);

        Ok(Self::from_sorted_edges(num_nodes, &sorted))
    }

    /// Builds the CSR arrays from edges already grouped by source node.
    ///
    /// Uses the two-pass counting technique: count out-degrees into
    /// `node_pointers`, prefix-sum them, then place every edge at its
    /// node's cursor.
    pub(crate) fn from_sorted_edges(num_nodes: usize, edges: &[Edge]) -> Self {
        let m = edges.len();
        let mut node_pointers = vec![0; num_nodes + 1];

        for &(u, _, _) in edges {
            node_pointers[u + 1] += 1;
        }

        for i in 1..=num_nodes {
            node_pointers[i] += node_pointers[i - 1];
        }

        let mut edge_targets = vec![0; m];
        let mut edge_weights = vec![0.0; m];
        let mut edge_rates = vec![0.0; m];
        let mut edge_source_by_index = vec![0; m];

        let mut cursor = node_pointers.clone();

        for &(u, v, rate) in edges {
            let pos = cursor[u];
            edge_weights[pos] = -rate.ln();
            edge_rates[pos] = rate;
            edge_targets[pos] = v;
            edge_source_by_index[pos] = u;
            cursor[u] += 1;
        }

        Self {
            num_nodes,
            node_pointers,
            edge_targets,
            edge_weights,
            edge_rates,
            edge_source_by_index,
        }
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_edges(&self) -> usize {
        self.edge_targets.len()
    }

    pub fn contains(&self, node: Instrument) -> bool {
        node < self.num_nodes
    }

    /// O(1) lookup of `(source, target, weight)` for an edge index.
    pub fn edge(&self, edge_idx: usize) -> Option<(Instrument, Instrument, f64)> {
        Some((
            *self.edge_source_by_index.get(edge_idx)?,
            *self.edge_targets.get(edge_idx)?,
            *self.edge_weights.get(edge_idx)?,
        ))
    }

    /// Original (untransformed) rate of an edge.
    pub fn edge_rate(&self, edge_idx: usize) -> Option<f64> {
        self.edge_rates.get(edge_idx).copied()
    }

    /// Iterates `(source, target, weight)` in edge index order.
    pub fn edges(&self) -> impl Iterator<Item = (Instrument, Instrument, f64)> + '_ {
        self.edge_source_by_index
            .iter()
            .zip(&self.edge_targets)
            .zip(&self.edge_weights)
            .map(|((&u, &v), &w)| (u, v, w))
    }

    /// Outgoing edges of `node` as `(target, weight)`.
    pub fn neighbors(&self, node: Instrument) -> impl Iterator<Item = (Instrument, f64)> + '_ {
        let (start, end) = if self.contains(node) {
            (self.node_pointers[node], self.node_pointers[node + 1])
        } else {
            (0, 0)
        };

        self.edge_targets[start..end]
            .iter()
            .copied()
            .zip(self.edge_weights[start..end].iter().copied())
    }

    /// Weight of the first `from -> to` edge, if any.
    pub fn weight(&self, from: Instrument, to: Instrument) -> Option<f64> {
        self.neighbors(from)
            .find(|&(target, _)| target == to)
            .map(|(_, w)| w)
    }
}
