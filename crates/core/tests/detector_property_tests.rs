use arb_cycle_core::{BellmanFordSolver, GraphSolver, RateGraphBuilder, find_arbitrage};
use common::error::Error;
use common::types::RateMatrix;
use proptest::prelude::*;
use std::collections::HashSet;

/// Rows of the six-currency demo market.
fn demo_market() -> RateMatrix {
    RateMatrix::new(vec![
        vec![1.00, 0.58, 0.63, 0.27, 0.17, 0.20],
        vec![1.68, 1.00, 0.39, 0.74, 0.47, 0.79],
        vec![1.57, 2.48, 1.00, 0.04, 0.15, 0.11],
        vec![3.64, 1.35, 22.94, 1.00, 0.22, 0.23],
        vec![5.84, 2.02, 6.84, 4.40, 1.00, 0.49],
        vec![4.76, 1.21, 8.59, 4.41, 1.97, 1.00],
    ])
}

fn matrix_and_start() -> impl Strategy<Value = (RateMatrix, usize)> {
    (1usize..8).prop_flat_map(|n| {
        (
            prop::collection::vec(prop::collection::vec(0.2f64..5.0, n), n).prop_map(RateMatrix::new),
            0..n,
        )
    })
}

/// Rates `p_i / p_j` from one price vector; every cycle multiplies to 1
/// up to rounding.
fn consistent_market() -> impl Strategy<Value = (RateMatrix, usize)> {
    (1usize..8).prop_flat_map(|n| {
        (
            prop::collection::vec(0.01f64..100.0, n)
                .prop_map(|prices| RateMatrix::from_prices(&prices)),
            0..n,
        )
    })
}

proptest! {
    #[test]
    fn detection_is_deterministic((matrix, start) in matrix_and_start()) {
        let first = find_arbitrage(&matrix, start).unwrap();
        let second = find_arbitrage(&matrix, start).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn consistent_markets_have_no_cycle((matrix, start) in consistent_market()) {
        prop_assert_eq!(find_arbitrage(&matrix, start), Ok(None));
    }

    /// Every leg is a real edge, the cycle is simple and its weight is negative.
    #[test]
    fn detected_cycles_are_valid((matrix, start) in matrix_and_start()) {
        let graph = RateGraphBuilder::build(&matrix).unwrap();
        if let Some(cycle) = BellmanFordSolver.find_negative_cycle(&graph, start).unwrap() {
            prop_assert!(!cycle.is_empty());
            prop_assert_eq!(cycle.rates.len(), cycle.len());

            let distinct: HashSet<_> = cycle.instruments.iter().collect();
            prop_assert_eq!(distinct.len(), cycle.len());

            let mut weight_sum = 0.0;
            for ((from, to), &rate) in cycle.legs().zip(&cycle.rates) {
                prop_assert_eq!(matrix.rate(from, to), Some(rate));
                weight_sum += graph.weight(from, to).unwrap();
            }

            prop_assert_eq!(weight_sum, cycle.total_weight);
            prop_assert!(cycle.total_weight < 0.0);
            prop_assert!(cycle.is_profitable());
        }
    }

    /// exp(-Σ -ln r_i) round-trips to Π r_i.
    #[test]
    fn multiplier_equals_rate_product((matrix, start) in matrix_and_start()) {
        if let Some(cycle) = find_arbitrage(&matrix, start).unwrap() {
            let product: f64 = cycle.rates.iter().product();
            prop_assert!((cycle.multiplier() - product).abs() <= 1e-9 * product);
        }
    }

    #[test]
    fn start_outside_matrix_is_rejected(n in 1usize..6, offset in 0usize..4) {
        let matrix = RateMatrix::from_prices(&vec![1.0; n]);
        let start = n + offset;
        prop_assert_eq!(
            find_arbitrage(&matrix, start),
            Err(Error::InvalidStartVertex { start, num_nodes: n })
        );
    }
}

#[test]
fn demo_market_reports_cycle_from_first_currency() {
    let cycle = find_arbitrage(&demo_market(), 0).unwrap().unwrap();

    assert_eq!(cycle.instruments, vec![1, 5, 3, 2]);
    assert_eq!(cycle.rates, vec![0.79, 4.41, 22.94, 2.48]);
    assert!((cycle.multiplier() - 198.20325168).abs() < 1e-6);
}

#[test]
fn demo_market_cycle_depends_on_start() {
    let market = demo_market();

    let from_two = find_arbitrage(&market, 2).unwrap().unwrap();
    assert_eq!(from_two.instruments, vec![5, 3, 2, 0]);
    assert!((from_two.multiplier() - 31.7659356).abs() < 1e-6);

    let from_four = find_arbitrage(&market, 4).unwrap().unwrap();
    assert_eq!(from_four.instruments, vec![4, 3, 2, 0]);
}

#[test]
fn editing_a_rate_changes_the_detected_cycle() {
    let mut market = demo_market();
    let before = find_arbitrage(&market, 0).unwrap().unwrap();

    market.set_rate(1, 2, 3.0).unwrap();
    let after = find_arbitrage(&market, 0).unwrap().unwrap();

    assert_ne!(before.instruments, after.instruments);
    assert_eq!(after.instruments, vec![5, 3, 2, 0]);
    assert!(after.multiplier() < before.multiplier());
}

#[test]
fn single_price_vector_has_no_cycle_from_any_start() {
    let market = RateMatrix::from_prices(&[1.0, 1.1, 1.2]);
    for start in 0..3 {
        assert_eq!(find_arbitrage(&market, start), Ok(None));
    }
}

#[test]
fn demo_market_rejects_zero_rate() {
    let mut market = demo_market();
    market.set_rate(3, 4, 0.0).unwrap();

    assert!(matches!(
        find_arbitrage(&market, 0),
        Err(Error::InvalidMatrix(_))
    ));
}
