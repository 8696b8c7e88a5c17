//! Headless Autoplay
//!
//! Plays many games with a scripted strategy and reports per-game
//! summaries plus aggregate statistics. Useful for tuning game configs.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use workload_sim::{play_game, GameConfig, GameSummary, Strategy};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Text,
}

/// Headless Autoplay - scripted games for config tuning
#[derive(Parser, Debug)]
#[command(name = "autoplay")]
#[command(about = "Play scripted games in parallel and report scores")]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 100)]
    games: u64,

    /// Seed of the first game; game i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Scripted player
    #[arg(long, value_enum, default_value = "balanced")]
    strategy: Strategy,

    /// Game config TOML (defaults to the standard five-day game)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: Format,
}

#[derive(Serialize)]
struct GameRecord {
    seed: u64,
    #[serde(flatten)]
    summary: GameSummary,
}

#[derive(Serialize)]
struct Aggregate {
    games: usize,
    mean_score: f64,
    min_score: u32,
    max_score: u32,
    mean_penalties: f64,
    mean_teaching_completed: f64,
    mean_collaborative_completed: f64,
}

/// JSON output structure
#[derive(Serialize)]
struct Report {
    strategy: Strategy,
    base_seed: u64,
    aggregate: Aggregate,
    results: Vec<GameRecord>,
}

fn mean(records: &[GameRecord], f: impl Fn(&GameSummary) -> u32) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: u64 = records.iter().map(|r| u64::from(f(&r.summary))).sum();
    sum as f64 / records.len() as f64
}

fn aggregate(records: &[GameRecord]) -> Aggregate {
    Aggregate {
        games: records.len(),
        mean_score: mean(records, |s| s.score),
        min_score: records.iter().map(|r| r.summary.score).min().unwrap_or(0),
        max_score: records.iter().map(|r| r.summary.score).max().unwrap_or(0),
        mean_penalties: mean(records, |s| s.penalties.total),
        mean_teaching_completed: mean(records, |s| s.teaching_completed),
        mean_collaborative_completed: mean(records, |s| s.collaborative_completed),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("workload_sim=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };

    let base_seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(
        games = args.games,
        base_seed,
        strategy = ?args.strategy,
        "starting autoplay"
    );

    let outcomes: Vec<_> = (0..args.games)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed.wrapping_add(i);
            play_game(config.clone(), seed, args.strategy).map(|summary| GameRecord { seed, summary })
        })
        .collect();

    let mut results = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Ok(record) => results.push(record),
            Err(e) => {
                eprintln!("Game failed: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    let report = Report {
        strategy: args.strategy,
        base_seed,
        aggregate: aggregate(&results),
        results,
    };

    match args.format {
        Format::Json => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize report: {}", e);
                return ExitCode::FAILURE;
            }
        },
        Format::Text => {
            println!("Autoplay Report");
            println!("===============");
            println!("Strategy: {:?}", report.strategy);
            println!("Base seed: {}", report.base_seed);
            println!();
            for record in &report.results {
                println!("Game (seed {})", record.seed);
                for line in record.summary.summary_lines() {
                    println!("  {}", line);
                }
            }
            let agg = &report.aggregate;
            println!();
            println!("Games: {}", agg.games);
            println!(
                "Score: mean {:.1}, min {}, max {}",
                agg.mean_score, agg.min_score, agg.max_score
            );
            println!("Mean penalties: {:.2}", agg.mean_penalties);
            println!("Mean teaching completed: {:.1}", agg.mean_teaching_completed);
            println!(
                "Mean collaborative completed: {:.1}",
                agg.mean_collaborative_completed
            );
        }
    }

    ExitCode::SUCCESS
}
