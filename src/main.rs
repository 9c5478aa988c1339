use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use greedy_bst::{
    report, BuildConfig, DatasetReader, GreedyBst, RootRank, WeightFormula, MAX_KEYS,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "greedy-bst",
    about = "Greedy weighted binary search trees and their expected search cost"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the expected cost of every record, one per line.
    Cost {
        /// Data file (header line + probability line per record).
        data: PathBuf,
        #[command(flatten)]
        build: BuildArgs,
    },
    /// Print the slot layout of a single record.
    Tree {
        /// Data file (header line + probability line per record).
        data: PathBuf,
        /// 1-based index of the record to show.
        #[arg(long, default_value_t = 1)]
        record: usize,
        #[command(flatten)]
        build: BuildArgs,
    },
}

#[derive(Args, Debug)]
struct BuildArgs {
    /// Rank used for the root's comparisons (zero-based compares the root by
    /// its 0-based position; nothing else changes).
    #[arg(long, value_enum, default_value_t = RootRankArg::OneBased)]
    root_rank: RootRankArg,
    /// Depth weighting for the cost.
    #[arg(long, value_enum, default_value_t = WeightsArg::Legacy)]
    weights: WeightsArg,
    /// Reject records with more keys than this.
    #[arg(long, default_value_t = MAX_KEYS)]
    max_keys: usize,
    /// Log every placement to stderr.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RootRankArg {
    OneBased,
    ZeroBased,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum WeightsArg {
    Legacy,
    Exact,
}

impl BuildArgs {
    fn config(&self) -> BuildConfig {
        BuildConfig {
            root_rank: match self.root_rank {
                RootRankArg::OneBased => RootRank::OneBased,
                RootRankArg::ZeroBased => RootRank::ZeroBased,
            },
            weights: match self.weights {
                WeightsArg::Legacy => WeightFormula::Legacy,
                WeightsArg::Exact => WeightFormula::Exact,
            },
            max_keys: self.max_keys,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Cost { data, build } => {
            init_tracing(build.verbose);
            run_cost(data, build.config())?
        }
        Commands::Tree {
            data,
            record,
            build,
        } => {
            init_tracing(build.verbose);
            run_tree(data, record, build.config())?
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_cost(data_path: PathBuf, config: BuildConfig) -> Result<()> {
    let reader = DatasetReader::open(&data_path)
        .with_context(|| format!("could not open data file {}", data_path.display()))?;

    let costs: Vec<f64> = GreedyBst::new(config)
        .evaluate_records(reader)
        .with_context(|| format!("failed to evaluate {}", data_path.display()))?
        .into_iter()
        .map(|result| result.cost)
        .collect();

    report::write_costs(&mut io::stdout().lock(), &costs)
}

fn run_tree(data_path: PathBuf, record_index: usize, config: BuildConfig) -> Result<()> {
    if record_index == 0 {
        bail!("record index is 1-based");
    }

    let mut reader = DatasetReader::open(&data_path)
        .with_context(|| format!("could not open data file {}", data_path.display()))?;
    let record = reader
        .nth(record_index - 1)
        .with_context(|| {
            format!(
                "{} has fewer than {} records",
                data_path.display(),
                record_index
            )
        })?
        .with_context(|| format!("failed to read record {record_index}"))?;

    let pipeline = GreedyBst::new(config);
    let result = pipeline
        .evaluate(&record.probabilities)
        .with_context(|| format!("record {record_index} (line {}) failed", record.line))?;

    let layout = report::render_layout(&result.tree, config.weights)?;
    print!("{layout}");
    println!("cost\t{}", report::format_cost(result.cost));

    Ok(())
}
