//! slotctl — inspect and tune slot configurations
//!
//! Usage:
//!   slotctl normalize                 - Normalize weights, refresh expected payout
//!   slotctl solve --target 150        - Reweight symbols toward a target payout
//!   slotctl spin                      - Play five spins
//!   slotctl prob --min 200 --max 400  - Exact total-payout probabilities
//!   slotctl odds                      - Chance of each prize tier
//!   slotctl simulate --plays 10000    - Batch simulation statistics
//!
//! Every command reads `--config FILE` (the built-in sample when omitted) and
//! prints JSON.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use slot_engine::{
    ConfigParser, PrizeTable, ProbabilityQuery, SlotConfig, SlotEngine, normalize,
    probability_query, solve_inverse,
};

#[derive(Parser)]
#[command(name = "slotctl", about = "Slot probability engine tools")]
struct Cli {
    /// Slot config JSON (defaults to the built-in sample config)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize symbol weights and refresh expected_total_5
    Normalize,
    /// Solve symbol probabilities for a target five-spin expected payout
    Solve {
        /// Target expected total payout over five spins
        #[arg(short, long)]
        target: f64,
    },
    /// Play one round of five spins
    Spin {
        /// Seed for reproducible spins
        #[arg(short, long)]
        seed: Option<u64>,
        /// Prize table JSON used to award the result
        #[arg(short, long)]
        prizes: Option<PathBuf>,
    },
    /// Exact probability of the total payout landing in a range
    Prob {
        /// Minimum total (inclusive)
        #[arg(long, default_value_t = 0.0)]
        min: f64,
        /// Maximum total (inclusive); unbounded when omitted
        #[arg(long)]
        max: Option<f64>,
        /// Number of spins
        #[arg(long, default_value_t = 5)]
        spins: i64,
        /// Query JSON file; overrides the flags above
        #[arg(short, long)]
        query: Option<PathBuf>,
    },
    /// Probability of each prize tier over one play
    Odds {
        /// Prize table JSON (defaults to the standard tiers)
        #[arg(short, long)]
        prizes: Option<PathBuf>,
    },
    /// Run many plays and report session statistics
    Simulate {
        /// Number of plays
        #[arg(short = 'n', long, default_value_t = 10_000)]
        plays: u64,
        /// Seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let parser = ConfigParser::new();
    let config = load_config(&parser, cli.config.as_deref())?;

    let output = run(&parser, &config, cli.command)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn run(parser: &ConfigParser, config: &SlotConfig, command: Commands) -> Result<serde_json::Value> {
    let value = match command {
        Commands::Normalize => serde_json::to_value(normalize(config)?)?,
        Commands::Solve { target } => {
            let solved = solve_inverse(config, target)?;
            log::info!(
                "solved for target {target}: expected_total_5 = {:.4}",
                solved.expected_total_5
            );
            serde_json::to_value(solved)?
        }
        Commands::Spin { seed, prizes } => {
            let prizes = load_prizes(parser, prizes.as_deref())?;
            let result = engine(seed).play(config)?.award(&prizes);
            serde_json::to_value(result)?
        }
        Commands::Prob {
            min,
            max,
            spins,
            query,
        } => {
            let query = match query {
                Some(path) => parser.parse_query(&read(&path)?)?,
                None => ProbabilityQuery {
                    threshold_min: min,
                    threshold_max: max,
                    spins,
                    ..Default::default()
                },
            };
            serde_json::to_value(probability_query(config, &query)?)?
        }
        Commands::Odds { prizes } => {
            let prizes = load_prizes(parser, prizes.as_deref())?;
            serde_json::to_value(prizes.odds(config)?)?
        }
        Commands::Simulate { plays, seed } => {
            let stats = engine(seed).simulate(config, plays)?;
            json!({
                "stats": stats,
                "hit_rate": stats.hit_rate(),
                "mean_play_payout": stats.mean_play_payout(),
                "expected_total_5": config.expected_total_5,
            })
        }
    };
    Ok(value)
}

fn engine(seed: Option<u64>) -> SlotEngine {
    match seed {
        Some(seed) => SlotEngine::seeded(seed),
        None => SlotEngine::new(),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn load_config(parser: &ConfigParser, path: Option<&Path>) -> Result<SlotConfig> {
    match path {
        Some(path) => {
            let config = parser
                .parse_json(&read(path)?)
                .with_context(|| format!("Invalid slot config {}", path.display()))?;
            log::info!("Loaded {} symbols from {}", config.symbols.len(), path.display());
            Ok(config)
        }
        None => {
            log::info!("No config given, using the sample config");
            Ok(SlotConfig::default())
        }
    }
}

fn load_prizes(parser: &ConfigParser, path: Option<&Path>) -> Result<PrizeTable> {
    match path {
        Some(path) => parser
            .parse_prizes(&read(path)?)
            .with_context(|| format!("Invalid prize table {}", path.display())),
        None => Ok(PrizeTable::standard()),
    }
}
