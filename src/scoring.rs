//! Final score and end-of-game summary

use serde::{Deserialize, Serialize};

use crate::core::config::GameConfig;
use crate::state::{Penalties, SimulationState};

const BASE_SCORE: i64 = 1000;
const TEACHING_WEIGHT: f64 = 500.0;
const COLLABORATIVE_WEIGHT: f64 = 300.0;
const ENERGY_BONUS: i64 = 10;
const PENALTY_COST: i64 = 50;

fn completion_points(completed: u32, total: u32, weight: f64) -> i64 {
    if total == 0 {
        return 0;
    }
    (f64::from(completed) / f64::from(total) * weight).floor() as i64
}

/// Score for a finished (or in-progress) game, never below zero
pub fn calculate_score(state: &SimulationState, config: &GameConfig) -> u32 {
    let tasks = &config.initial_tasks;
    let score = BASE_SCORE
        + completion_points(state.teaching.completed, tasks.teaching_modules, TEACHING_WEIGHT)
        + completion_points(
            state.collaborative.completed,
            tasks.collaborative_units,
            COLLABORATIVE_WEIGHT,
        )
        + i64::from(state.energy) * ENERGY_BONUS
        - i64::from(state.penalties.total) * PENALTY_COST;
    score.max(0) as u32
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub teaching_completed: u32,
    pub teaching_total: u32,
    pub collaborative_completed: u32,
    pub collaborative_total: u32,
    pub admin_completed: u32,
    pub admin_remaining: u32,
    pub final_energy: u32,
    pub daily_energy: u32,
    pub penalties: Penalties,
    pub rounds_played: usize,
    pub disrupted_rounds: usize,
    pub score: u32,
}

impl GameSummary {
    pub fn from_state(state: &SimulationState, config: &GameConfig) -> Self {
        Self {
            teaching_completed: state.teaching.completed,
            teaching_total: config.initial_tasks.teaching_modules,
            collaborative_completed: state.collaborative.completed,
            collaborative_total: config.initial_tasks.collaborative_units,
            admin_completed: state.admin.completed,
            admin_remaining: state.admin.remaining,
            final_energy: state.energy,
            daily_energy: config.energy.daily_start,
            penalties: state.penalties,
            rounds_played: state.action_history.len(),
            disrupted_rounds: state.action_history.iter().filter(|h| !h.success).count(),
            score: calculate_score(state, config),
        }
    }

    pub fn summary_lines(&self) -> Vec<String> {
        let admin = if self.admin_completed > 0 {
            "Completed"
        } else {
            "Incomplete"
        };
        vec![
            format!(
                "Teaching Modules: {}/{}",
                self.teaching_completed, self.teaching_total
            ),
            format!(
                "Collaborative: {}/{}",
                self.collaborative_completed, self.collaborative_total
            ),
            format!(
                "Admin Tasks: {} ({} done, {} outstanding)",
                admin, self.admin_completed, self.admin_remaining
            ),
            format!("Final Energy: {}/{}", self.final_energy, self.daily_energy),
            format!(
                "Penalty Points: {} (teaching {}, admin {}, collaborative {}, meetings {})",
                self.penalties.total,
                self.penalties.teaching,
                self.penalties.admin,
                self.penalties.collaborative,
                self.penalties.meetings
            ),
            format!(
                "Rounds: {} played, {} disrupted",
                self.rounds_played, self.disrupted_rounds
            ),
            format!("Score: {}", self.score),
        ]
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fixture() -> (GameConfig, SimulationState) {
        let config = GameConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let state = SimulationState::new(&config, &mut rng);
        (config, state)
    }

    #[test]
    fn test_fresh_game_score() {
        let (config, state) = fixture();
        // 1000 base + 14 energy * 10
        assert_eq!(calculate_score(&state, &config), 1140);
    }

    #[test]
    fn test_score_components() {
        let (config, mut state) = fixture();
        state.teaching.completed = 40;
        state.collaborative.completed = 10;
        state.energy = 0;
        state.penalties.teaching = 3;
        state.calculate_total_penalties();
        // 1000 + 250 + 150 - 150
        assert_eq!(calculate_score(&state, &config), 1250);
    }

    #[test]
    fn test_completion_points_round_down() {
        assert_eq!(completion_points(1, 3, 500.0), 166);
        assert_eq!(completion_points(5, 0, 500.0), 0);
    }

    #[test]
    fn test_score_floored_at_zero() {
        let (config, mut state) = fixture();
        state.energy = 0;
        state.penalties.meetings = 40;
        state.calculate_total_penalties();
        assert_eq!(calculate_score(&state, &config), 0);
    }

    #[test]
    fn test_summary_lines() {
        let (config, state) = fixture();
        let summary = GameSummary::from_state(&state, &config);
        let lines = summary.summary_lines();
        assert_eq!(lines[0], "Teaching Modules: 0/80");
        assert!(lines[2].starts_with("Admin Tasks: Incomplete"));
        assert_eq!(lines.last().map(String::as_str), Some("Score: 1140"));
    }
}
