use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write;

use super::error::Error;
use super::searcher::SearchSummary;
use super::sweep::SweepPoint;
use super::types::InstrumentPair;
use common::types::{ArbitrageCycle, Instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Serialize)]
struct DetectionReport<'a> {
    start: Instrument,
    cycle: Option<&'a [Instrument]>,
    rates: Option<&'a [f64]>,
    multiplier: Option<f64>,
    profit_percentage: Option<f64>,
}

impl<'a> DetectionReport<'a> {
    fn new(start: Instrument, cycle: Option<&'a ArbitrageCycle>) -> Self {
        DetectionReport {
            start,
            cycle: cycle.map(|c| c.instruments.as_slice()),
            rates: cycle.map(|c| c.rates.as_slice()),
            multiplier: cycle.map(ArbitrageCycle::multiplier),
            profit_percentage: cycle.map(ArbitrageCycle::profit_percentage),
        }
    }
}

#[derive(Serialize)]
struct MatrixReport<'a> {
    title: &'a str,
    rows: &'a [Vec<f64>],
}

#[derive(Serialize)]
struct SweepReport<'a> {
    from: Instrument,
    to: Instrument,
    points: Vec<SweepLine<'a>>,
}

#[derive(Serialize)]
struct SweepLine<'a> {
    rate: f64,
    cycle: Option<&'a [Instrument]>,
    multiplier: Option<f64>,
}

/// Formats matrices and detection results for stdout.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    format: OutputFormat,
    precision: usize,
}

impl Renderer {
    pub fn new(format: OutputFormat, precision: usize) -> Self {
        Renderer { format, precision }
    }

    /// Table with instrument indices along both axes.
    pub fn matrix(&self, title: &str, rows: &[Vec<f64>]) -> Result<String, Error> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string(&MatrixReport { title, rows })?);
        }

        let precision = self.precision;
        let width = rows
            .iter()
            .flatten()
            .map(|value| format!("{:.precision$}", value).len())
            .max()
            .unwrap_or(1)
            .max(3);

        let mut out = String::new();
        writeln!(out, "{}", title).ok();
        write!(out, "{:>4}", "").ok();
        for j in 0..rows.len() {
            write!(out, " {:>width$}", j).ok();
        }
        writeln!(out).ok();

        for (i, row) in rows.iter().enumerate() {
            write!(out, "{:>4}", i).ok();
            for value in row {
                write!(out, " {:>width$.precision$}", value).ok();
            }
            writeln!(out).ok();
        }

        Ok(out)
    }

    pub fn detection(
        &self,
        start: Instrument,
        cycle: Option<&ArbitrageCycle>,
    ) -> Result<String, Error> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string(&DetectionReport::new(start, cycle))?);
        }

        let Some(cycle) = cycle else {
            return Ok("No arbitrage cycle found.".to_string());
        };

        let precision = self.precision;
        let mut out = String::new();
        writeln!(out, "Arbitrage cycle found: {}", cycle_path(cycle)).ok();
        for ((from, to), rate) in cycle.legs().zip(&cycle.rates) {
            writeln!(out, "  {} -> {} @ {:.precision$}", from, to, rate).ok();
        }
        write!(
            out,
            "Arbitrage multiplier: {:.precision$} (profit {:.precision$}%)",
            cycle.multiplier(),
            cycle.profit_percentage()
        )
        .ok();

        Ok(out)
    }

    pub fn sweep(&self, pair: InstrumentPair, points: &[SweepPoint]) -> Result<String, Error> {
        if self.format == OutputFormat::Json {
            let report = SweepReport {
                from: pair.from,
                to: pair.to,
                points: points
                    .iter()
                    .map(|point| SweepLine {
                        rate: point.rate,
                        cycle: point.cycle.as_ref().map(|c| c.instruments.as_slice()),
                        multiplier: point.multiplier(),
                    })
                    .collect(),
            };
            return Ok(serde_json::to_string(&report)?);
        }

        let precision = self.precision;
        let mut out = String::new();
        writeln!(out, "Sweeping rate {} -> {}", pair.from, pair.to).ok();
        for point in points {
            match &point.cycle {
                Some(cycle) => writeln!(
                    out,
                    "  rate {:.precision$}: {} (multiplier {:.precision$})",
                    point.rate,
                    cycle_path(cycle),
                    cycle.multiplier()
                )
                .ok(),
                None => writeln!(out, "  rate {:.precision$}: no cycle", point.rate).ok(),
            };
        }

        Ok(out.trim_end().to_string())
    }

    pub fn summary(&self, summary: &SearchSummary) -> Result<String, Error> {
        if self.format == OutputFormat::Json {
            return Ok(serde_json::to_string(summary)?);
        }

        let precision = self.precision;
        let best = match summary.best_multiplier {
            Some(best) => format!("best multiplier {:.precision$}", best),
            None => "no cycle found".to_string(),
        };

        Ok(format!(
            "Scanned {} snapshots, {} with an arbitrage cycle, {}.",
            summary.snapshots, summary.cycles_found, best
        ))
    }
}

/// `1 -> 5 -> 3 -> 2 -> 1`: the cycle closed back on its first instrument.
pub fn cycle_path(cycle: &ArbitrageCycle) -> String {
    cycle
        .instruments
        .iter()
        .chain(cycle.instruments.first())
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
