use tokio::sync::mpsc::Sender;
use tracing::info;

use super::{error::Error, types::MatrixSource};
use common::types::RateMatrix;

pub struct Producer<S: MatrixSource> {
    source: S,
}

impl<S> Producer<S>
where
    S: MatrixSource,
{
    pub fn new(source: S) -> Self {
        Producer { source }
    }

    /// Spawns the source onto the runtime. The sender is dropped when the
    /// source finishes, which closes the channel for the searcher.
    pub fn spawn(self, sender: Sender<RateMatrix>) -> tokio::task::JoinHandle<Result<(), Error>> {
        info!("Producer ready.");
        tokio::spawn(async move { self.source.run_stream(sender).await })
    }
}
