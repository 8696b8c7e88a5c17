//! Workload Sim - round-based staff workload simulation
//!
//! A player spends a daily energy budget on teaching, admin and
//! collaborative work across a fixed calendar of rounds, while staff
//! meetings, random disruptions and end-of-day penalty rules push back.

pub mod core;
pub mod engine;
pub mod rules;
pub mod scoring;
pub mod state;
pub mod strategy;

pub use crate::core::config::GameConfig;
pub use crate::core::error::{GameError, Result};
pub use crate::core::types::{ActionId, DisruptionKind, Phase};
pub use engine::{ActionOutcome, GameEngine};
pub use scoring::{calculate_score, GameSummary};
pub use state::SimulationState;
pub use strategy::{play_game, Strategy};
