use arb_cycle_core::{RateGraphBuilder, WeightedDigraph};
use common::error::Error;
use common::types::RateMatrix;
use proptest::prelude::*;
use proptest::strategy::Strategy;

const MATRIX_SIZE_STRATEGY: std::ops::Range<usize> = 1usize..8;

fn matrix_strategy() -> impl Strategy<Value = RateMatrix> {
    MATRIX_SIZE_STRATEGY.prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec(0.01f64..10.0, n), n).prop_map(RateMatrix::new)
    })
}

fn edge_list_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize, f64)>)> {
    (1usize..10).prop_flat_map(|num_nodes| {
        let edge_generator = (0usize..num_nodes, 0usize..num_nodes, 0.01f64..10.0);
        let edges_generator = prop::collection::vec(edge_generator, 0..50);

        (Just(num_nodes), edges_generator)
    })
}

proptest! {
    /// Property: a matrix of size N yields N nodes and N² edges.
    #[test]
    fn matrix_graph_is_complete(matrix in matrix_strategy()) {
        let n = matrix.len();
        let graph = RateGraphBuilder::build(&matrix).unwrap();

        prop_assert_eq!(graph.num_nodes(), n);
        prop_assert_eq!(graph.num_edges(), n * n);
        for u in 0..n {
            prop_assert_eq!(graph.neighbors(u).count(), n);
        }
    }

    /// Property: edges come out row-major with weight -ln(rate).
    #[test]
    fn matrix_edges_row_major_with_log_weights(matrix in matrix_strategy()) {
        let graph = RateGraphBuilder::build(&matrix).unwrap();

        let expected: Vec<(usize, usize, f64)> = matrix
            .rows()
            .iter()
            .enumerate()
            .flat_map(|(i, row)| row.iter().enumerate().map(move |(j, &r)| (i, j, -r.ln())))
            .collect();
        let actual: Vec<(usize, usize, f64)> = graph.edges().collect();

        prop_assert_eq!(actual, expected);
    }

    /// Property: a single bad entry anywhere rejects the whole matrix.
    #[test]
    fn any_non_positive_entry_is_rejected(
        matrix in matrix_strategy(),
        row in any::<prop::sample::Index>(),
        col in any::<prop::sample::Index>(),
        bad in prop_oneof![Just(0.0f64), -10.0f64..0.0, Just(f64::NAN), Just(f64::INFINITY)],
    ) {
        let n = matrix.len();
        let mut matrix = matrix;
        matrix.set_rate(row.index(n), col.index(n), bad).unwrap();

        let result = RateGraphBuilder::build(&matrix);
        prop_assert!(matches!(result, Err(Error::InvalidMatrix(_))));
    }

    /// Property: all listed edges are kept and grouped by source.
    #[test]
    fn edge_list_graph_groups_by_source((num_nodes, edges) in edge_list_strategy()) {
        let graph = WeightedDigraph::from_edges(num_nodes, &edges).unwrap();
        prop_assert_eq!(graph.num_edges(), edges.len());

        let sources: Vec<usize> = graph.edges().map(|(u, _, _)| u).collect();
        prop_assert!(sources.windows(2).all(|w| w[0] <= w[1]));

        for u in 0..num_nodes {
            let expected = edges.iter().filter(|&&(from, _, _)| from == u).count();
            prop_assert_eq!(graph.neighbors(u).count(), expected);
        }
    }
}
