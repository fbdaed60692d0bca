//! CLI command definitions for divset.
//!
//! Two commands cover the library surface: `counters` evaluates the
//! coincidence counters and the full index table for one aggregate, and
//! `select` runs greedy diversity selection over a fingerprint matrix.
//!
//! Matrix input is a JSON array of equal-length 0/1 arrays, row-major.

use std::fs;
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use serde::Serialize;
use tracing::info;

use crate::counters::{CoincidenceThreshold, Counters, WeightScheme};
use crate::error::ConfigError;
use crate::fingerprint::FingerprintSet;
use crate::indices::{full_table, IndexKind, IndexTable, WeightMode};
use crate::selection::{DiversitySelector, SeedMode, SelectionConfig};

/// n-ary fingerprint similarity and diversity selection.
#[derive(Parser)]
#[command(name = "divset")]
#[command(about = "Compute n-ary similarity counters and select diverse fingerprint subsets")]
#[command(version)]
#[command(
    long_about = "divset compares collections of binary fingerprints through extended \
similarity counters and greedily selects diverse subsets.\n\nExample usage:\n  \
divset select matrix.json --count 10 --index JT --start medoid"
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    pub log_level: String,
}

/// Available CLI subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Compute coincidence counters and the full index table.
    Counters(CountersArgs),

    /// Greedily select a diverse subset of a fingerprint pool.
    #[command(alias = "sel")]
    Select(SelectArgs),
}

/// Arguments for `divset counters`.
#[derive(Parser, Debug)]
pub struct CountersArgs {
    /// JSON fingerprint matrix (array of equal-length 0/1 arrays).
    #[arg(required_unless_present = "theoretical")]
    pub input: Option<String>,

    /// Compare a theoretical population of N random fingerprints of
    /// infinite length instead of an observed matrix.
    #[arg(long, value_name = "N", conflicts_with = "input")]
    pub theoretical: Option<u64>,

    /// Coincidence threshold: 'none', 'dissimilar', an integer, or a
    /// fraction in (0, 1).
    #[arg(short = 't', long, default_value = "none")]
    pub threshold: String,

    /// Weight factor: 'fraction', 'power_<k>', or 'identity'.
    #[arg(short = 'w', long, default_value = "fraction")]
    pub w_factor: String,

    /// Output JSON instead of a human-readable summary.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Arguments for `divset select`.
#[derive(Parser, Debug)]
pub struct SelectArgs {
    /// JSON fingerprint matrix (array of equal-length 0/1 arrays).
    pub input: String,

    /// YAML run configuration; individual flags below override its fields.
    #[arg(short = 'c', long)]
    pub config: Option<String>,

    /// Number of fingerprints to select, seed included.
    #[arg(short = 'k', long)]
    pub count: Option<usize>,

    /// n-ary similarity index to minimize (abbreviation or full name).
    #[arg(short = 'i', long)]
    pub index: Option<String>,

    /// Index variant: 'weighted' or 'unweighted'.
    #[arg(long)]
    pub weight_mode: Option<String>,

    /// Coincidence threshold: 'none', 'dissimilar', an integer, or a
    /// fraction in (0, 1).
    #[arg(short = 't', long)]
    pub threshold: Option<String>,

    /// Weight factor: 'fraction', 'power_<k>', or 'identity'.
    #[arg(short = 'w', long)]
    pub w_factor: Option<String>,

    /// Starting point: 'medoid', 'random', or 'outlier'.
    #[arg(short = 's', long)]
    pub start: Option<String>,

    /// RNG seed for reproducible 'random' starts.
    #[arg(long)]
    pub rng_seed: Option<u64>,

    /// Output JSON instead of a human-readable summary.
    #[arg(short = 'j', long)]
    pub json: bool,
}

/// Parses CLI arguments.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

/// Runs the CLI with parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Counters(args) => run_counters(args),
        Commands::Select(args) => run_select(args),
    }
}

/// Loads a fingerprint matrix from a JSON file.
fn load_matrix(path: &Path) -> anyhow::Result<FingerprintSet> {
    let text = fs::read_to_string(path)
        .map_err(ConfigError::from)
        .with_context(|| format!("failed to read fingerprint matrix '{}'", path.display()))?;
    let rows: Vec<Vec<u8>> = serde_json::from_str(&text)
        .map_err(ConfigError::from)
        .with_context(|| format!("'{}' is not a JSON 0/1 matrix", path.display()))?;
    let set = FingerprintSet::from_rows(&rows)?;
    info!(
        fingerprints = set.len(),
        width = set.width(),
        "loaded fingerprint matrix"
    );
    Ok(set)
}

#[derive(Serialize)]
struct CountersReport {
    n: u64,
    threshold: CoincidenceThreshold,
    w_factor: WeightScheme,
    counters: Counters,
    indices: IndexTable,
}

fn run_counters(args: CountersArgs) -> anyhow::Result<()> {
    let threshold: CoincidenceThreshold = args.threshold.parse()?;
    let w_factor: WeightScheme = args.w_factor.parse()?;

    let (n, counters) = match args.theoretical {
        Some(n) => (n, Counters::theoretical(n, threshold, w_factor)?),
        None => {
            let input = args.input.as_deref().unwrap_or_default();
            let set = load_matrix(Path::new(input))?;
            let aggregate = set.column_sums();
            (
                aggregate.n(),
                Counters::from_column_sums(&aggregate, threshold, w_factor)?,
            )
        }
    };
    let indices = full_table(&counters);

    if args.json {
        let report = CountersReport {
            n,
            threshold,
            w_factor,
            counters,
            indices,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("population: {n}  threshold: {threshold}  weights: {w_factor}");
    println!(
        "a={} w_a={:.6}  d={} w_d={:.6}",
        counters.a, counters.w_a, counters.d, counters.w_d
    );
    println!(
        "sim={}/{:.6}  dis={}/{:.6}  p={}/{:.6}",
        counters.total_sim,
        counters.total_w_sim,
        counters.total_dis,
        counters.total_w_dis,
        counters.p,
        counters.w_p
    );
    println!("{:<6} {:>12} {:>12}", "index", "weighted", "unweighted");
    for kind in IndexKind::ALL {
        let tag = kind.abbreviation();
        println!(
            "{:<6} {:>12.6} {:>12.6}",
            tag, indices.weighted[tag], indices.unweighted[tag]
        );
    }
    Ok(())
}

/// Merges the optional YAML run file and command-line overrides.
fn build_config(args: &SelectArgs) -> anyhow::Result<SelectionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(ConfigError::from)
                .with_context(|| format!("failed to read run configuration '{path}'"))?;
            serde_yaml::from_str(&text)
                .map_err(ConfigError::from)
                .with_context(|| format!("'{path}' is not a valid run configuration"))?
        }
        None => SelectionConfig::default(),
    };

    if let Some(count) = args.count {
        config.target_size = count;
    }
    if let Some(index) = &args.index {
        config.index = index.parse::<IndexKind>()?;
    }
    if let Some(mode) = &args.weight_mode {
        config.weight_mode = mode.parse::<WeightMode>()?;
    }
    if let Some(threshold) = &args.threshold {
        config.threshold = threshold.parse::<CoincidenceThreshold>()?;
    }
    if let Some(w_factor) = &args.w_factor {
        config.w_factor = w_factor.parse::<WeightScheme>()?;
    }
    if let Some(start) = &args.start {
        config.seed_mode = start.parse::<SeedMode>()?;
    }
    if args.rng_seed.is_some() {
        config.rng_seed = args.rng_seed;
    }
    Ok(config)
}

#[derive(Serialize)]
struct SelectReport<'a> {
    config: &'a SelectionConfig,
    seed: usize,
    selected: &'a [usize],
}

fn run_select(args: SelectArgs) -> anyhow::Result<()> {
    let config = build_config(&args)?;
    let set = load_matrix(Path::new(&args.input))?;

    info!(
        index = %config.index,
        mode = %config.weight_mode,
        start = %config.seed_mode,
        count = config.target_size,
        "running diversity selection"
    );
    let result = DiversitySelector::new(config.clone()).run(&set)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&SelectReport {
                config: &config,
                seed: result.seed,
                selected: &result.selected,
            })?
        );
        return Ok(());
    }

    println!(
        "selected {} of {} fingerprints (seed {} via {})",
        result.selected.len(),
        set.len(),
        result.seed,
        config.seed_mode
    );
    println!("order: {:?}", result.selected);
    for (i, step) in result.steps.iter().enumerate() {
        println!(
            "  step {:>3}: picked {:>4}  {}={:.6}  ties={}",
            i + 1,
            step.chosen,
            config.index,
            step.value,
            step.tie_size
        );
    }
    Ok(())
}
