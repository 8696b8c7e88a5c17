//! Scripted players for headless runs and benchmarks

use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::types::ActionId;
use crate::engine::GameEngine;
use crate::scoring::GameSummary;
use crate::state::MemoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Meet the daily minimums, keep admin under the cap, rest when low
    Balanced,
    /// Teach whenever possible, otherwise rest
    TeachFirst,
    /// Uniformly random among enabled actions
    Random,
}

/// Energy at or below which the balanced player rests instead of working
const REST_THRESHOLD: u32 = 3;
/// Clear the admin backlog while energy still buys the top admin tier
const ADMIN_ENERGY: u32 = 8;

impl Strategy {
    pub fn choose<R: Rng + ?Sized>(&self, engine: &GameEngine, rng: &mut R) -> ActionId {
        let state = engine.state();
        let enabled: Vec<ActionId> = state
            .available_actions
            .iter()
            .copied()
            .filter(|a| !engine.is_action_disabled(*a))
            .collect();
        let offers = |action: ActionId| enabled.contains(&action);

        let fallback = enabled
            .first()
            .or(state.available_actions.first())
            .copied()
            .unwrap_or(ActionId::Break);

        match self {
            Strategy::Random => enabled.choose(rng).copied().unwrap_or(fallback),
            Strategy::TeachFirst => {
                if offers(ActionId::Teach) {
                    ActionId::Teach
                } else if offers(ActionId::AttendMeeting) {
                    ActionId::AttendMeeting
                } else if offers(ActionId::Break) {
                    ActionId::Break
                } else {
                    fallback
                }
            }
            Strategy::Balanced => {
                let config = engine.config();
                let clock = config.clock();
                let last_round = clock.is_last_round_of_day(state.current_round);
                let admin_over_cap = state
                    .admin
                    .remaining
                    .saturating_mul(config.admin_compounding.multiplier.max(1))
                    > config.penalties.admin_max_end_of_day;

                if offers(ActionId::AttendMeeting) {
                    ActionId::AttendMeeting
                } else if state.energy > ADMIN_ENERGY && offers(ActionId::Admin) {
                    ActionId::Admin
                } else if state.energy <= REST_THRESHOLD && offers(ActionId::Break) && !last_round {
                    ActionId::Break
                } else if last_round && admin_over_cap && offers(ActionId::Admin) {
                    ActionId::Admin
                } else if state.daily_teaching_completed < config.penalties.teaching_min_per_day
                    && offers(ActionId::Teach)
                {
                    ActionId::Teach
                } else if state.collaborative.completed < config.penalties.collaborative_min_total
                    && offers(ActionId::Collaborate)
                {
                    ActionId::Collaborate
                } else if offers(ActionId::Admin) {
                    ActionId::Admin
                } else if offers(ActionId::Teach) {
                    ActionId::Teach
                } else {
                    fallback
                }
            }
        }
    }
}

/// Play one complete game in memory and return its summary
pub fn play_game(config: GameConfig, seed: u64, strategy: Strategy) -> Result<GameSummary> {
    let mut engine = GameEngine::new(config, seed, Box::new(MemoryStore::new()))?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
    engine.start_selection_phase();

    while !engine.is_over() {
        let action = strategy.choose(&engine, &mut rng);
        engine.execute_action(action)?;
        engine.advance_round()?;
    }

    Ok(engine.summary())
}
