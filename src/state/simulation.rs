//! SimulationState - the authoritative record of one game

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::GameConfig;
use crate::core::types::{ActionId, DisruptionKind, Phase, RoundId, TaskCategory};

/// Remaining and completed units of one task category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaskPool {
    pub remaining: u32,
    pub completed: u32,
}

impl TaskPool {
    pub fn new(remaining: u32) -> Self {
        Self {
            remaining,
            completed: 0,
        }
    }

    /// Move up to `units` from remaining to completed, returning how many moved
    pub fn complete(&mut self, units: u32) -> u32 {
        let done = units.min(self.remaining);
        self.remaining -= done;
        self.completed = self.completed.saturating_add(done);
        done
    }
}

/// Penalty points by source
///
/// `total` is derived. Only `recompute_total` writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Penalties {
    pub teaching: u32,
    pub admin: u32,
    pub collaborative: u32,
    pub meetings: u32,
    pub total: u32,
}

impl Penalties {
    pub fn recompute_total(&mut self) -> u32 {
        self.total = self
            .teaching
            .saturating_add(self.admin)
            .saturating_add(self.collaborative)
            .saturating_add(self.meetings);
        self.total
    }
}

/// One completed round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Global round id
    pub round: RoundId,
    pub day: u32,
    pub action: Option<ActionId>,
    pub success: bool,
}

/// Default action list before any rule has run
pub fn standard_actions() -> Vec<ActionId> {
    vec![
        ActionId::Teach,
        ActionId::Admin,
        ActionId::Collaborate,
        ActionId::Break,
    ]
}

/// Full mutable state of a game
///
/// Owned by the engine for the lifetime of a game. Callers outside the
/// engine only ever see `&SimulationState`; rules get `&mut` during
/// evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    // Calendar
    pub current_day: u32,
    pub current_round: u32,
    pub current_round_id: RoundId,
    pub phase: Phase,

    // Resources
    pub energy: u32,
    pub daily_energy: u32,

    // Tasks
    pub teaching: TaskPool,
    pub admin: TaskPool,
    pub collaborative: TaskPool,
    pub daily_teaching_completed: u32,

    pub penalties: Penalties,

    /// Disrupted round ids, sorted ascending, fixed for the game
    pub disruptions: Vec<RoundId>,

    // Per-round scratch, cleared at every selection phase
    pub selected_action: Option<ActionId>,
    pub action_success: bool,
    pub current_disruption: Option<DisruptionKind>,
    pub available_actions: Vec<ActionId>,
    pub mandatory_action: Option<ActionId>,
    pub force_break: bool,
    pub is_end_of_day: bool,
    pub is_game_end: bool,
    pub disruption_message: Option<String>,
    pub special_message: Option<String>,
    pub result_message: Option<String>,

    pub action_history: Vec<HistoryEntry>,
}

impl SimulationState {
    pub fn new<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        let daily_start = config.energy.daily_start;
        let tasks = &config.initial_tasks;
        Self {
            current_day: 1,
            current_round: 1,
            current_round_id: 1,
            phase: Phase::Selection,
            energy: daily_start,
            daily_energy: daily_start,
            teaching: TaskPool::new(tasks.teaching_modules),
            admin: TaskPool::new(tasks.admin_units_per_day),
            collaborative: TaskPool::new(tasks.collaborative_units),
            daily_teaching_completed: 0,
            penalties: Penalties::default(),
            disruptions: Self::generate_disruptions(config, rng),
            selected_action: None,
            action_success: true,
            current_disruption: None,
            available_actions: standard_actions(),
            mandatory_action: None,
            force_break: false,
            is_end_of_day: false,
            is_game_end: false,
            disruption_message: None,
            special_message: None,
            result_message: None,
            action_history: Vec::new(),
        }
    }

    /// Reinitialise everything for a fresh game
    pub fn reset<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) {
        *self = Self::new(config, rng);
    }

    /// Draw the disrupted rounds for a game
    ///
    /// Candidates are rounds `2..=total_rounds`; the first `total` entries of
    /// a uniform shuffle are kept and returned in ascending order.
    pub fn generate_disruptions<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Vec<RoundId> {
        let total_rounds = config.structure.total_rounds;
        let mut candidates: Vec<RoundId> = (2..=total_rounds).collect();
        candidates.shuffle(rng);
        candidates.truncate(config.disruptions.total as usize);
        candidates.sort_unstable();
        candidates
    }

    pub fn has_disruption(&self, round_id: RoundId) -> bool {
        self.disruptions.binary_search(&round_id).is_ok()
    }

    pub fn is_staff_meeting_round(&self, config: &GameConfig, round_id: RoundId) -> bool {
        config.meeting_round_ids().contains(&round_id)
    }

    pub fn calculate_total_penalties(&mut self) -> u32 {
        self.penalties.recompute_total()
    }

    pub fn pool(&self, category: TaskCategory) -> &TaskPool {
        match category {
            TaskCategory::Teaching => &self.teaching,
            TaskCategory::Admin => &self.admin,
            TaskCategory::Collaborative => &self.collaborative,
        }
    }

    pub fn pool_mut(&mut self, category: TaskCategory) -> &mut TaskPool {
        match category {
            TaskCategory::Teaching => &mut self.teaching,
            TaskCategory::Admin => &mut self.admin,
            TaskCategory::Collaborative => &mut self.collaborative,
        }
    }

    /// Clear the per-round fields ahead of a selection phase
    pub fn clear_round_scratch(&mut self) {
        self.phase = Phase::Selection;
        self.selected_action = None;
        self.action_success = true;
        self.current_disruption = None;
        self.disruption_message = None;
        self.special_message = None;
        self.result_message = None;
        self.mandatory_action = None;
        self.is_end_of_day = false;
        self.is_game_end = false;
        self.force_break = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fresh() -> (GameConfig, SimulationState) {
        let config = GameConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let state = SimulationState::new(&config, &mut rng);
        (config, state)
    }

    #[test]
    fn test_new_state_starts_at_day_one() {
        let (_, state) = fresh();
        assert_eq!(state.current_day, 1);
        assert_eq!(state.current_round, 1);
        assert_eq!(state.current_round_id, 1);
        assert_eq!(state.phase, Phase::Selection);
        assert_eq!(state.energy, 14);
        assert_eq!(state.teaching.remaining, 80);
        assert_eq!(state.admin.remaining, 4);
        assert_eq!(state.collaborative.remaining, 20);
        assert_eq!(state.penalties, Penalties::default());
        assert!(state.action_history.is_empty());
        assert_eq!(state.disruptions.len(), 3);
    }

    #[test]
    fn test_reset_discards_progress() {
        let (config, mut state) = fresh();
        state.current_round_id = 17;
        state.energy = 2;
        state.penalties.meetings = 3;
        state.teaching.complete(10);

        let mut rng = ChaCha8Rng::seed_from_u64(8);
        state.reset(&config, &mut rng);
        assert_eq!(state.current_round_id, 1);
        assert_eq!(state.energy, 14);
        assert_eq!(state.penalties.meetings, 0);
        assert_eq!(state.teaching, TaskPool::new(80));
    }

    #[test]
    fn test_disruptions_skip_round_one_and_are_unique() {
        let config = GameConfig::default();
        for seed in 0..200 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let rounds = SimulationState::generate_disruptions(&config, &mut rng);
            assert_eq!(rounds.len(), 3);
            assert!(rounds.windows(2).all(|w| w[0] < w[1]));
            assert!(rounds.iter().all(|&r| (2..=40).contains(&r)));
        }
    }

    #[test]
    fn test_disruption_count_capped_by_candidates() {
        let mut config = GameConfig::default();
        config.structure = crate::core::config::StructureConfig {
            total_rounds: 4,
            rounds_per_day: 2,
            total_days: 2,
        };
        config.disruptions.total = 10;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let rounds = SimulationState::generate_disruptions(&config, &mut rng);
        assert_eq!(rounds, vec![2, 3, 4]);
    }

    #[test]
    fn test_has_disruption_is_exact_membership() {
        let (_, mut state) = fresh();
        state.disruptions = vec![4, 9, 30];
        assert!(state.has_disruption(9));
        assert!(!state.has_disruption(10));
        assert!(!state.has_disruption(1));
    }

    #[test]
    fn test_staff_meeting_rounds() {
        let (config, state) = fresh();
        assert!(state.is_staff_meeting_round(&config, 11));
        assert!(state.is_staff_meeting_round(&config, 20));
        assert!(state.is_staff_meeting_round(&config, 38));
        assert!(!state.is_staff_meeting_round(&config, 12));
    }

    #[test]
    fn test_total_penalties_recomputed_not_accumulated() {
        let (_, mut state) = fresh();
        state.penalties.teaching = 2;
        state.penalties.admin = 1;
        state.penalties.meetings = 1;
        state.penalties.total = 99;
        assert_eq!(state.calculate_total_penalties(), 4);
        assert_eq!(state.calculate_total_penalties(), 4);
        assert_eq!(state.penalties.total, 4);
    }

    #[test]
    fn test_task_pool_complete_caps_at_remaining() {
        let mut pool = TaskPool::new(2);
        assert_eq!(pool.complete(3), 2);
        assert_eq!(pool, TaskPool { remaining: 0, completed: 2 });
        assert_eq!(pool.complete(1), 0);
    }
}
