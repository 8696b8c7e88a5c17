//! Rule-driven game engine
//!
//! Drives one game through Selection -> Result -> (Selection | End). All
//! mutation of the [`SimulationState`] happens here or inside rules the
//! engine evaluates.

pub mod effects;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::GameConfig;
use crate::core::error::{GameError, Result};
use crate::core::types::{ActionId, DisruptionKind, Phase, GENERIC_DISRUPTION_MESSAGE};
use crate::rules::RuleSet;
use crate::scoring::GameSummary;
use crate::state::{HistoryEntry, SaveStore, SimulationState, DEFAULT_SAVE_SLOT};

pub use effects::ActionOutcome;

pub struct GameEngine {
    config: GameConfig,
    rules: RuleSet,
    state: SimulationState,
    rng: ChaCha8Rng,
    store: Box<dyn SaveStore>,
    slot: String,
}

impl GameEngine {
    /// Create an engine with a fresh game
    ///
    /// Nothing is persisted until the first phase change, so `resume` can
    /// still pick up an earlier save.
    pub fn new(config: GameConfig, seed: u64, store: Box<dyn SaveStore>) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let state = SimulationState::new(&config, &mut rng);
        tracing::info!(seed, disruptions = ?state.disruptions, "new game created");
        Ok(Self {
            config,
            rules: RuleSet::standard(),
            state,
            rng,
            store,
            slot: DEFAULT_SAVE_SLOT.to_string(),
        })
    }

    /// Create an engine around an existing state, e.g. a scripted scenario
    pub fn from_state(
        config: GameConfig,
        state: SimulationState,
        seed: u64,
        store: Box<dyn SaveStore>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rules: RuleSet::standard(),
            state,
            rng: ChaCha8Rng::seed_from_u64(seed),
            store,
            slot: DEFAULT_SAVE_SLOT.to_string(),
        })
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn rules_mut(&mut self) -> &mut RuleSet {
        &mut self.rules
    }

    pub fn is_over(&self) -> bool {
        self.state.phase == Phase::End
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary::from_state(&self.state, &self.config)
    }

    /// Begin a fresh selection phase for the current round
    pub fn start_selection_phase(&mut self) {
        if self.state.phase == Phase::End {
            tracing::debug!("ignoring selection phase request after game end");
            return;
        }
        self.state.clear_round_scratch();
        self.state.available_actions = self.calculate_available_actions();
        self.rules
            .evaluate(&mut self.state, &self.config, Phase::Selection);
        tracing::debug!(
            round_id = self.state.current_round_id,
            actions = ?self.state.available_actions,
            "selection phase started"
        );
        self.persist();
    }

    /// Actions on offer this round, before selection rules run
    pub fn calculate_available_actions(&self) -> Vec<ActionId> {
        let state = &self.state;
        if state.is_staff_meeting_round(&self.config, state.current_round_id) {
            return vec![ActionId::AttendMeeting, ActionId::SkipMeeting];
        }
        if state.energy == 0 {
            return vec![ActionId::Break];
        }

        let mut actions = Vec::with_capacity(4);
        if state.teaching.remaining > 0 {
            actions.push(ActionId::Teach);
        }
        if state.admin.remaining > 0 {
            actions.push(ActionId::Admin);
        }
        if state.collaborative.remaining > 0 {
            actions.push(ActionId::Collaborate);
        }
        actions.push(ActionId::Break);
        actions
    }

    /// Whether an action should be greyed out for the player
    pub fn is_action_disabled(&self, action: ActionId) -> bool {
        if action != ActionId::Break && self.state.energy == 0 {
            return true;
        }
        action
            .category()
            .is_some_and(|category| self.state.pool(category).remaining == 0)
    }

    /// Resolve the player's choice for this round
    ///
    /// Rejected calls leave the state untouched.
    pub fn execute_action(&mut self, action: ActionId) -> Result<ActionOutcome> {
        match self.state.phase {
            Phase::End => return Err(GameError::GameOver),
            Phase::Result => return Err(GameError::WrongPhase(Phase::Result)),
            Phase::Selection => {}
        }
        if !self.state.available_actions.contains(&action) || self.is_action_disabled(action) {
            return Err(GameError::InvalidAction(action));
        }

        let energy_before = self.state.energy;
        let penalties_before = self.state.penalties.total;
        self.state.selected_action = Some(action);
        self.state.phase = Phase::Result;

        let mut units = 0;
        if self.state.has_disruption(self.state.current_round_id) {
            self.state.action_success = false;
            let kind = self.draw_disruption();
            self.state.current_disruption = kind;
            if kind.is_none() {
                self.state.disruption_message = Some(GENERIC_DISRUPTION_MESSAGE.to_string());
            }
            tracing::info!(
                round_id = self.state.current_round_id,
                ?kind,
                %action,
                "round disrupted"
            );
        } else {
            self.state.action_success = true;
            units = effects::apply_action(&mut self.state, &self.config, action);
            tracing::debug!(%action, units, energy = self.state.energy, "action applied");
        }

        self.state.is_end_of_day = self
            .config
            .clock()
            .is_last_round_of_day(self.state.current_round);
        self.state.is_game_end =
            self.state.current_round_id >= self.config.structure.total_rounds;

        // One result pass for both the disrupted and the normal path
        self.rules
            .evaluate(&mut self.state, &self.config, Phase::Result);
        let total = self.state.calculate_total_penalties();
        self.persist();

        Ok(ActionOutcome {
            action,
            success: self.state.action_success,
            units,
            energy_before,
            energy_after: self.state.energy,
            disruption: self.state.current_disruption,
            penalty_points: total.saturating_sub(penalties_before),
        })
    }

    /// Record the finished round and move on
    pub fn advance_round(&mut self) -> Result<()> {
        match self.state.phase {
            Phase::End => return Err(GameError::GameOver),
            Phase::Selection => return Err(GameError::WrongPhase(Phase::Selection)),
            Phase::Result => {}
        }

        self.state.action_history.push(HistoryEntry {
            round: self.state.current_round_id,
            day: self.state.current_day,
            action: self.state.selected_action,
            success: self.state.action_success,
        });

        self.state.current_round_id += 1;
        self.state.current_round += 1;

        if self.state.current_round > self.config.structure.rounds_per_day {
            self.end_day();
            self.state.current_day += 1;
            self.state.current_round = 1;
            self.start_day();
        }

        if self.state.current_round_id > self.config.structure.total_rounds {
            self.end_game();
        } else {
            self.start_selection_phase();
        }
        Ok(())
    }

    /// Restore the saved game, if any
    pub fn resume(&mut self) -> bool {
        let loaded = self.state.load(
            &*self.store,
            &self.slot,
            &self.config,
            &mut self.rng,
        );
        if !loaded {
            return false;
        }
        tracing::info!(
            round_id = self.state.current_round_id,
            phase = ?self.state.phase,
            "resumed saved game"
        );
        if self.state.phase == Phase::Selection {
            self.start_selection_phase();
        }
        true
    }

    /// Throw away the current game and start over
    pub fn play_again(&mut self) {
        self.state.reset(&self.config, &mut self.rng);
        SimulationState::clear_save(&mut *self.store, &self.slot);
        tracing::info!(disruptions = ?self.state.disruptions, "new game started");
        self.start_selection_phase();
    }

    fn draw_disruption(&mut self) -> Option<DisruptionKind> {
        self.config.disruptions.types.choose(&mut self.rng).copied()
    }

    fn end_day(&mut self) {
        let state = &mut self.state;
        tracing::info!(
            day = state.current_day,
            taught = state.daily_teaching_completed,
            admin_backlog = state.admin.remaining,
            penalties = state.penalties.total,
            "day complete"
        );
        state.daily_teaching_completed = 0;
        state.daily_energy = self.config.energy.daily_start;
        state.energy = state.energy.min(state.daily_energy);
        state.admin.remaining = state
            .admin
            .remaining
            .saturating_add(self.config.initial_tasks.admin_units_per_day);
    }

    fn start_day(&mut self) {
        self.state.energy = self.state.daily_energy;
    }

    fn end_game(&mut self) {
        self.state.phase = Phase::End;
        self.state.is_game_end = true;
        let total = self.state.calculate_total_penalties();
        tracing::info!(
            penalties = total,
            rounds = self.state.action_history.len(),
            "game over"
        );
        self.persist();
    }

    fn persist(&mut self) {
        self.state.save(&mut *self.store, &self.slot);
    }
}
