use tracing::debug;

use super::error::Error;
use super::types::InstrumentPair;
use arb_cycle_core::{GraphSolver, RateGraphBuilder};
use common::types::{ArbitrageCycle, Instrument, RateMatrix};

/// Detection result for one value of the swept rate.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub rate: f64,
    pub cycle: Option<ArbitrageCycle>,
}

impl SweepPoint {
    pub fn multiplier(&self) -> Option<f64> {
        self.cycle.as_ref().map(ArbitrageCycle::multiplier)
    }
}

/// `steps` evenly spaced values from `min` to `max`, both ends included.
pub fn linspace(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, Error> {
    if !(min.is_finite() && max.is_finite()) || min <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "sweep range must be positive and finite, got {}..{}",
            min, max
        )));
    }
    if min > max {
        return Err(Error::InvalidArgument(format!(
            "sweep minimum {} exceeds maximum {}",
            min, max
        )));
    }
    if steps == 0 {
        return Err(Error::InvalidArgument(
            "sweep needs at least one step".to_string(),
        ));
    }
    if steps == 1 {
        return Ok(vec![min]);
    }

    let step = (max - min) / (steps - 1) as f64;
    Ok((0..steps)
        .map(|k| if k == steps - 1 { max } else { min + step * k as f64 })
        .collect())
}

/// Reruns detection once per rate, each on a fresh copy of `base` with
/// `pair` set to that rate. No state carries over between points.
pub fn sweep_rate<S: GraphSolver>(
    solver: &S,
    base: &RateMatrix,
    pair: InstrumentPair,
    rates: &[f64],
    start: Instrument,
) -> Result<Vec<SweepPoint>, Error> {
    rates
        .iter()
        .map(|&rate| -> Result<SweepPoint, Error> {
            let mut matrix = base.clone();
            matrix.set_rate(pair.from, pair.to, rate)?;

            let graph = RateGraphBuilder::build(&matrix)?;
            let cycle = solver.find_negative_cycle(&graph, start)?;
            debug!(rate, found = cycle.is_some(), "sweep point");

            Ok(SweepPoint { rate, cycle })
        })
        .collect()
}
