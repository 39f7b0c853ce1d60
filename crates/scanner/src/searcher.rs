use serde::Serialize;
use tokio::sync::mpsc::Receiver;
use tracing::{error, info};

use super::error::Error;
use super::report::Renderer;
use arb_cycle_core::{GraphSolver, RateGraphBuilder};
use common::error::Error as ArbCycleError;
use common::types::{Instrument, RateMatrix};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchSummary {
    pub snapshots: usize,
    pub cycles_found: usize,
    pub best_multiplier: Option<f64>,
}

impl SearchSummary {
    fn record(&mut self, multiplier: Option<f64>) {
        self.snapshots += 1;
        if let Some(multiplier) = multiplier {
            self.cycles_found += 1;
            self.best_multiplier = Some(self.best_multiplier.map_or(multiplier, |b| b.max(multiplier)));
        }
    }
}

/// Consumes rate matrix snapshots and runs a fresh detection on each.
///
/// Nothing is shared between runs: every snapshot gets its own graph and
/// distance tables. Any detection error ends the search.
pub struct MatrixSearcher<S> {
    solver: S,
    receiver: Receiver<RateMatrix>,
    start: Instrument,
    renderer: Renderer,
}

impl<S> MatrixSearcher<S>
where
    S: GraphSolver,
{
    pub fn new(receiver: Receiver<RateMatrix>, start: Instrument, solver: S, renderer: Renderer) -> Self {
        MatrixSearcher {
            solver,
            receiver,
            start,
            renderer,
        }
    }

    /// Runs until the producer closes the channel.
    pub async fn search_for_arbs(mut self) -> Result<SearchSummary, Error> {
        info!(start = self.start, "Searcher ready.");

        let mut summary = SearchSummary::default();

        while let Some(matrix) = self.receiver.recv().await {
            let graph = RateGraphBuilder::build(&matrix)?;

            let cycle = match self.solver.find_negative_cycle(&graph, self.start) {
                Ok(cycle) => cycle,
                Err(e @ ArbCycleError::ReconstructionFailure { .. }) => {
                    error!("Searcher: cycle reconstruction defect: {}", e);
                    return Err(e.into());
                }
                Err(e) => return Err(e.into()),
            };

            match &cycle {
                Some(found) => {
                    info!(len = found.len(), multiplier = found.multiplier(), "Cycle FOUND");
                }
                None => info!("Search complete: No arbitrage opportunities."),
            }

            summary.record(cycle.as_ref().map(|c| c.multiplier()));
            println!("{}", self.renderer.detection(self.start, cycle.as_ref())?);
        }

        info!(
            snapshots = summary.snapshots,
            cycles_found = summary.cycles_found,
            "Searcher finished."
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::canonical_matrix;
    use crate::report::OutputFormat;
    use arb_cycle_core::BellmanFordSolver;
    use common::error::MatrixDefect;
    use tokio::sync::mpsc;

    fn searcher(receiver: Receiver<RateMatrix>, start: Instrument) -> MatrixSearcher<BellmanFordSolver> {
        MatrixSearcher::new(
            receiver,
            start,
            BellmanFordSolver,
            Renderer::new(OutputFormat::Text, 4),
        )
    }

    #[tokio::test]
    async fn summarises_every_snapshot() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(canonical_matrix()).await.unwrap();
        tx.send(RateMatrix::from_prices(&[1.0, 2.0, 1.0, 2.0, 1.0, 2.0]))
            .await
            .unwrap();
        drop(tx);

        let summary = searcher(rx, 0).search_for_arbs().await.unwrap();

        assert_eq!(summary.snapshots, 2);
        assert_eq!(summary.cycles_found, 1);
        assert!((summary.best_multiplier.unwrap() - 198.20325168).abs() < 1e-6);
    }

    #[tokio::test]
    async fn consistent_snapshots_count_no_cycles() {
        let (tx, rx) = mpsc::channel(2);
        tx.send(RateMatrix::from_prices(&[1.0, 1.3, 0.7, 2.9, 0.11, 5.3]))
            .await
            .unwrap();
        tx.send(RateMatrix::from_prices(&[1.0, 1.1, 1.2])).await.unwrap();
        drop(tx);

        let summary = searcher(rx, 0).search_for_arbs().await.unwrap();

        assert_eq!(summary.snapshots, 2);
        assert_eq!(summary.cycles_found, 0);
        assert_eq!(summary.best_multiplier, None);
    }

    #[tokio::test]
    async fn invalid_matrix_stops_the_search() {
        let (tx, rx) = mpsc::channel(4);
        tx.send(RateMatrix::new(vec![vec![1.0, -1.0], vec![1.0, 1.0]]))
            .await
            .unwrap();
        drop(tx);

        let result = searcher(rx, 0).search_for_arbs().await;
        assert!(matches!(
            result,
            Err(Error::GraphError(ArbCycleError::InvalidMatrix(
                MatrixDefect::NonPositive { .. }
            )))
        ));
    }

    #[tokio::test]
    async fn start_outside_matrix_stops_the_search() {
        let (tx, rx) = mpsc::channel(1);
        tx.send(canonical_matrix()).await.unwrap();
        drop(tx);

        let result = searcher(rx, 6).search_for_arbs().await;
        assert!(matches!(
            result,
            Err(Error::GraphError(ArbCycleError::InvalidStartVertex { start: 6, .. }))
        ));
    }

    #[tokio::test]
    async fn closed_channel_gives_empty_summary() {
        let (tx, rx) = mpsc::channel::<RateMatrix>(1);
        drop(tx);

        let summary = searcher(rx, 0).search_for_arbs().await.unwrap();
        assert_eq!(summary, SearchSummary::default());
    }
}
