use async_trait::async_trait;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tokio::sync::mpsc::Sender;
use tokio::time::{self, Duration};
use tracing::{debug, info};

use super::config::SimulatorConfig;
use super::error::Error;
use super::types::MatrixSource;
use common::types::RateMatrix;

/// Produces noisy snapshots of a base market for simulation purposes.
///
/// Each snapshot multiplies every off-diagonal rate of the base matrix by
/// an independent factor in `1 ± rate_fluctuation_bps / 10_000`. Snapshots
/// are drawn from the base, not from each other, so they never drift.
pub struct SimulatorSource {
    base: RateMatrix,
    config: SimulatorConfig,
}

impl SimulatorSource {
    pub fn new(base: RateMatrix, config: SimulatorConfig) -> Self {
        SimulatorSource { base, config }
    }

    fn perturb(&self, rng: &mut SmallRng) -> RateMatrix {
        let fluctuation = self.config.rate_fluctuation_bps / 10_000.0;

        let rows = self
            .base
            .rows()
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.iter()
                    .enumerate()
                    .map(|(j, &rate)| {
                        if i == j {
                            rate
                        } else {
                            rate * (1.0 + rng.random_range(-fluctuation..=fluctuation))
                        }
                    })
                    .collect()
            })
            .collect();

        RateMatrix::new(rows)
    }
}

#[async_trait]
impl MatrixSource for SimulatorSource {
    /// Sends `snapshots` perturbed matrices, one per `interval_ms` tick.
    ///
    /// Backpressure is handled by awaiting `sender.send()`. Exits with
    /// `ChannelSendFailed` if the receiver is dropped early.
    async fn run_stream(self, sender: Sender<RateMatrix>) -> Result<(), Error> {
        let mut interval = time::interval(Duration::from_millis(self.config.interval_ms.max(1)));

        let mut rng = match self.config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        for snapshot in 0..self.config.snapshots {
            interval.tick().await;

            let matrix = self.perturb(&mut rng);
            debug!(snapshot, "simulator produced snapshot");

            if sender.send(matrix).await.is_err() {
                info!("Simulator shutting down: searcher receiver dropped.");
                return Err(Error::ChannelSendFailed);
            }
        }

        info!(snapshots = self.config.snapshots, "Simulator finished.");
        Ok(())
    }
}
