//! Workload Sim - Entry Point
//!
//! Plays the game in the terminal. The game is saved after every phase
//! change and picked up again on the next launch unless `--new` is given.

use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use workload_sim::core::error::Result;
use workload_sim::state::FileStore;
use workload_sim::{ActionId, GameConfig, GameEngine, Phase};

/// Terminal driver for the workload simulation
#[derive(Parser, Debug)]
#[command(name = "workload-sim")]
#[command(about = "Spend your energy wisely across a week of teaching, admin and meetings")]
struct Args {
    /// Game config TOML (defaults to the standard five-day game)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for disruption scheduling
    #[arg(long)]
    seed: Option<u64>,

    /// Directory holding the save slot
    #[arg(long, default_value = ".workload-sim")]
    save_dir: PathBuf,

    /// Ignore any saved game and start fresh
    #[arg(long)]
    new: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("workload_sim=warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    let store = FileStore::new(&args.save_dir);
    let mut engine = GameEngine::new(config, seed, Box::new(store))?;

    if args.new {
        engine.play_again();
    } else if engine.resume() {
        println!("Resuming saved game.");
    } else {
        engine.start_selection_phase();
    }

    println!("\n=== WORKLOAD SIM ===");
    println!("Commands: <number> or <action name> to act, status / s, quit / q");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let phase = engine.state().phase;
        match phase {
            Phase::Selection => {
                display_selection(&engine);
                let Some(input) = prompt(&mut lines, "> ")? else {
                    break;
                };
                match input.as_str() {
                    "" => continue,
                    "quit" | "q" => break,
                    "status" | "s" => display_detailed_status(&engine),
                    other => match pick_action(&engine, other) {
                        Some(action) => {
                            if let Err(e) = engine.execute_action(action) {
                                println!("{}", e);
                            }
                        }
                        None => println!("Unknown action '{}'", other),
                    },
                }
            }
            Phase::Result => {
                display_result(&engine);
                if prompt(&mut lines, "(enter to continue) ")?.is_none() {
                    break;
                }
                engine.advance_round()?;
            }
            Phase::End => {
                println!("\n=== GAME OVER ===");
                for line in engine.summary().summary_lines() {
                    println!("  {}", line);
                }
                match prompt(&mut lines, "Play again? [y/N] ")? {
                    Some(answer) if answer.eq_ignore_ascii_case("y") => engine.play_again(),
                    _ => break,
                }
            }
        }
    }

    println!("\nGoodbye!");
    Ok(())
}

fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    text: &str,
) -> io::Result<Option<String>> {
    print!("{}", text);
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?.trim().to_string())),
        None => Ok(None),
    }
}

/// Resolve a menu number or action name against this round's actions
fn pick_action(engine: &GameEngine, input: &str) -> Option<ActionId> {
    let actions = &engine.state().available_actions;
    if let Ok(n) = input.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| actions.get(i)).copied();
    }
    input.parse::<ActionId>().ok()
}

fn display_selection(engine: &GameEngine) {
    let state = engine.state();
    println!();
    println!(
        "--- Day {} | Round {} | Energy {}/{} ---",
        state.current_day, state.current_round, state.energy, state.daily_energy
    );
    println!(
        "  Teaching {} left | Admin {} left | Collaborative {} left",
        state.teaching.remaining, state.admin.remaining, state.collaborative.remaining
    );
    if let Some(message) = &state.special_message {
        println!("  ! {}", message);
    }
    if state.force_break {
        println!("  ! You are exhausted and must take a break.");
    }
    for (i, action) in state.available_actions.iter().enumerate() {
        let disabled = if engine.is_action_disabled(*action) {
            " (unavailable)"
        } else {
            ""
        };
        println!("  {}. {}{}", i + 1, action.label(), disabled);
    }
}

fn display_result(engine: &GameEngine) {
    let state = engine.state();
    println!();
    let message = if state.action_success {
        state
            .result_message
            .as_deref()
            .unwrap_or("Action completed successfully.")
    } else {
        state
            .disruption_message
            .as_deref()
            .unwrap_or("Action was disrupted!")
    };
    println!("{}", message);
    if let Some(action) = state.selected_action {
        println!("  Action: {}", action.label());
    }
    println!("  Energy: {}", state.energy);
    if state.penalties.total > 0 {
        println!("  Penalty Points: {}", state.penalties.total);
    }
    if state.is_end_of_day {
        println!("  End of Day");
    }
}

fn display_detailed_status(engine: &GameEngine) {
    let state = engine.state();
    let config = engine.config();
    println!();
    println!("=== Status (round {}/{}) ===", state.current_round_id, config.structure.total_rounds);
    println!(
        "  Teaching: {}/{} (today {}/{})",
        state.teaching.completed,
        config.initial_tasks.teaching_modules,
        state.daily_teaching_completed,
        config.penalties.teaching_min_per_day
    );
    println!(
        "  Collaborative: {}/{} (need {})",
        state.collaborative.completed,
        config.initial_tasks.collaborative_units,
        config.penalties.collaborative_min_total
    );
    println!(
        "  Admin: {} done, {} outstanding (cap {})",
        state.admin.completed, state.admin.remaining, config.penalties.admin_max_end_of_day
    );
    println!(
        "  Penalties: teaching {}, admin {}, collaborative {}, meetings {} = {}",
        state.penalties.teaching,
        state.penalties.admin,
        state.penalties.collaborative,
        state.penalties.meetings,
        state.penalties.total
    );
    println!("  Rounds played: {}", state.action_history.len());
}
