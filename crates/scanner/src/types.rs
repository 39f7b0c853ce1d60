use std::str::FromStr;

use tokio::sync::mpsc::Sender;

use super::error::Error;
use common::types::{Instrument, RateMatrix};

/// Anything that can push rate matrix snapshots to the searcher: the
/// simulator today, a live feed later. Each snapshot is searched on its own.
#[async_trait::async_trait]
pub trait MatrixSource: Send + Sync + 'static {
    async fn run_stream(self, sender: Sender<RateMatrix>) -> Result<(), Error>;
}

/// An ordered `FROM:TO` pair of instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstrumentPair {
    pub from: Instrument,
    pub to: Instrument,
}

impl FromStr for InstrumentPair {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidArgument(format!("expected FROM:TO, got '{}'", s));

        let (from, to) = s.split_once(':').ok_or_else(invalid)?;
        let from = from.trim().parse().map_err(|_| invalid())?;
        let to = to.trim().parse().map_err(|_| invalid())?;

        Ok(InstrumentPair { from, to })
    }
}

/// A single user-edited rate, written `FROM:TO=RATE`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateOverride {
    pub pair: InstrumentPair,
    pub rate: f64,
}

impl RateOverride {
    pub fn apply(&self, matrix: &mut RateMatrix) -> Result<(), Error> {
        matrix.set_rate(self.pair.from, self.pair.to, self.rate)?;
        Ok(())
    }
}

impl FromStr for RateOverride {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (pair, rate) = s.split_once('=').ok_or_else(|| {
            Error::InvalidArgument(format!("expected FROM:TO=RATE, got '{}'", s))
        })?;

        let pair = pair.parse()?;
        let rate = rate
            .trim()
            .parse()
            .map_err(|_| Error::InvalidArgument(format!("'{}' is not a rate", rate)))?;

        Ok(RateOverride { pair, rate })
    }
}
