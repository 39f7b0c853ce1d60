pub mod config;
pub mod csv_source;
pub mod error;
pub mod market;
pub mod producer;
pub mod report;
pub mod searcher;
pub mod simulator;
pub mod sweep;
pub mod types;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use arb_cycle_core::{BellmanFordSolver, find_arbitrage};
use common::types::{Instrument, RateMatrix};
use error::Error;
use producer::Producer;
use report::{OutputFormat, Renderer};
use searcher::MatrixSearcher;
use simulator::SimulatorSource;
use types::{InstrumentPair, RateOverride};

const DEFAULT_LOG_FILTER: &str = "scanner=info,arb_cycle_core=warn";

/// Finds currency arbitrage cycles in exchange-rate matrices.
#[derive(Debug, Parser)]
#[command(name = "scanner", version)]
struct Cli {
    /// Configuration file [default: crates/scanner/Config.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Start instrument for detection, overrides `detector.start_vertex`
    #[arg(long, global = true)]
    start: Option<Instrument>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one detection on the demo market or a CSV matrix
    Scan {
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Edit a rate before scanning, e.g. `--set 1:2=3.0` (repeatable)
        #[arg(long = "set", value_name = "FROM:TO=RATE")]
        overrides: Vec<RateOverride>,

        /// Print the rate matrix and its -ln transform first
        #[arg(long)]
        show_matrix: bool,
    },
    /// Stream perturbed snapshots through the producer/searcher pipeline
    Simulate {
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Overrides `simulator.snapshots`
        #[arg(long)]
        snapshots: Option<usize>,
    },
    /// Rerun detection across a range of values for one rate
    Sweep {
        #[arg(long, value_name = "FROM:TO")]
        pair: InstrumentPair,

        #[arg(long)]
        min: f64,

        #[arg(long)]
        max: f64,

        #[arg(long, default_value_t = 10)]
        steps: usize,

        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let config = config::load_config(cli.config.as_deref())?;
    let start = cli.start.unwrap_or(config.detector.start_vertex);
    let renderer = Renderer::new(cli.format, config.report.precision);

    match cli.command {
        Command::Scan {
            csv,
            overrides,
            show_matrix,
        } => {
            let mut matrix = load_base(csv.as_deref())?;
            for edit in &overrides {
                edit.apply(&mut matrix)?;
                info!(from = edit.pair.from, to = edit.pair.to, rate = edit.rate, "rate edited");
            }

            if show_matrix {
                println!("{}", renderer.matrix("Exchange rates", matrix.rows())?);
                println!("{}", renderer.matrix("-ln(rate)", &matrix.log_transformed())?);
            }

            let cycle = find_arbitrage(&matrix, start)?;
            println!("{}", renderer.detection(start, cycle.as_ref())?);
        }
        Command::Simulate { csv, snapshots } => {
            let base = load_base(csv.as_deref())?;
            let mut sim_config = config.simulator.clone();
            if let Some(snapshots) = snapshots {
                sim_config.snapshots = snapshots;
            }

            let (sender, receiver) = mpsc::channel::<RateMatrix>(config.pipeline.buffer_size);

            info!("Starting SimulatorSource producer task...");
            let producer_handle = Producer::new(SimulatorSource::new(base, sim_config)).spawn(sender);

            let searcher = MatrixSearcher::new(receiver, start, BellmanFordSolver, renderer);
            let summary = searcher.search_for_arbs().await;

            // A searcher failure drops the receiver, so the producer's own
            // send error is secondary and the searcher's error wins.
            let produced = producer_handle.await?;
            let summary = summary?;
            produced?;

            println!("{}", renderer.summary(&summary)?);
            info!("Pipeline shut down.");
        }
        Command::Sweep {
            pair,
            min,
            max,
            steps,
            csv,
        } => {
            let base = load_base(csv.as_deref())?;
            let rates = sweep::linspace(min, max, steps)?;
            let points = sweep::sweep_rate(&BellmanFordSolver, &base, pair, &rates, start)?;
            println!("{}", renderer.sweep(pair, &points)?);
        }
    }

    Ok(())
}

fn load_base(csv: Option<&Path>) -> Result<RateMatrix, Error> {
    match csv {
        Some(path) => {
            info!("Loading rate matrix from {}", path.display());
            csv_source::read_matrix(path)
        }
        None => Ok(market::canonical_matrix()),
    }
}
