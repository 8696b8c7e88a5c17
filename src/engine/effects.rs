//! Resource and energy effects of each action
//!
//! Energy is read before anything changes; units come from the category's
//! ladder, are capped at what remains, and the cost is taken afterwards
//! with a floor of zero.

use serde::Serialize;

use crate::core::config::{EnergyLadder, GameConfig};
use crate::core::types::{ActionId, DisruptionKind, TaskCategory};
use crate::state::SimulationState;

/// What a single `execute_action` call did, for drivers and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionOutcome {
    pub action: ActionId,
    pub success: bool,
    /// Task units completed this round
    pub units: u32,
    pub energy_before: u32,
    pub energy_after: u32,
    pub disruption: Option<DisruptionKind>,
    /// Penalty points added this round, including boundary rules
    pub penalty_points: u32,
}

fn plural(units: u32) -> &'static str {
    if units == 1 {
        ""
    } else {
        "s"
    }
}

/// Apply a successful action to the state, returning the task units produced
pub fn apply_action(state: &mut SimulationState, config: &GameConfig, action: ActionId) -> u32 {
    let rates = &config.task_rates;
    let costs = &config.energy.costs;
    match action {
        ActionId::Teach => {
            let units = work(state, TaskCategory::Teaching, &rates.teaching, costs.teaching);
            state.daily_teaching_completed = state.daily_teaching_completed.saturating_add(units);
            state.result_message = Some(format!(
                "Taught {} module{}. Energy: -{}",
                units,
                plural(units),
                costs.teaching
            ));
            units
        }
        ActionId::Admin => {
            let units = work(state, TaskCategory::Admin, &rates.admin, costs.admin);
            state.result_message = Some(format!(
                "Completed {} admin task{}. Energy: -{}",
                units,
                plural(units),
                costs.admin
            ));
            units
        }
        ActionId::Collaborate => {
            let units = work(
                state,
                TaskCategory::Collaborative,
                &rates.collaborative,
                costs.collaborative,
            );
            state.result_message = Some(format!(
                "Completed {} collaborative unit{}. Energy: -{}",
                units,
                plural(units),
                costs.collaborative
            ));
            units
        }
        ActionId::Break => {
            let gain = config.energy.gains.rest;
            state.energy = state.energy.saturating_add(gain).min(state.daily_energy);
            state.result_message = Some(format!("Took a break. Energy: +{}", gain));
            0
        }
        ActionId::AttendMeeting => {
            state.energy = state.energy.saturating_sub(costs.meeting);
            state.result_message = Some(format!(
                "Attended staff meeting. Energy: -{}",
                costs.meeting
            ));
            0
        }
        ActionId::SkipMeeting => {
            let penalty = config.penalties.skip_meeting;
            state.penalties.meetings = state.penalties.meetings.saturating_add(penalty);
            state.result_message = Some(format!("Skipped staff meeting. Penalty: +{}", penalty));
            0
        }
    }
}

fn work(state: &mut SimulationState, category: TaskCategory, ladder: &EnergyLadder, cost: u32) -> u32 {
    let units = ladder.units_for(state.energy);
    let done = state.pool_mut(category).complete(units);
    state.energy = state.energy.saturating_sub(cost);
    done
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn with_energy(energy: u32) -> (GameConfig, SimulationState) {
        let config = GameConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut state = SimulationState::new(&config, &mut rng);
        state.energy = energy;
        (config, state)
    }

    #[test]
    fn test_teaching_ladder() {
        for (energy, expected_units, expected_energy) in
            [(14, 3, 12), (7, 2, 5), (3, 1, 1), (0, 0, 0), (1, 1, 0)]
        {
            let (config, mut state) = with_energy(energy);
            let units = apply_action(&mut state, &config, ActionId::Teach);
            assert_eq!(units, expected_units, "energy {}", energy);
            assert_eq!(state.energy, expected_energy, "energy {}", energy);
            assert_eq!(state.teaching.remaining, 80 - expected_units);
            assert_eq!(state.teaching.completed, expected_units);
            assert_eq!(state.daily_teaching_completed, expected_units);
        }
    }

    #[test]
    fn test_admin_capped_at_remaining() {
        let (config, mut state) = with_energy(14);
        state.admin.remaining = 3;
        let units = apply_action(&mut state, &config, ActionId::Admin);
        assert_eq!(units, 3);
        assert_eq!(state.admin.remaining, 0);
        assert_eq!(state.admin.completed, 3);
        assert_eq!(state.energy, 12);
        assert_eq!(
            state.result_message.as_deref(),
            Some("Completed 3 admin tasks. Energy: -2")
        );
    }

    #[test]
    fn test_admin_low_energy_yields_two() {
        let (config, mut state) = with_energy(8);
        assert_eq!(apply_action(&mut state, &config, ActionId::Admin), 2);
        assert_eq!(state.energy, 6);
    }

    #[test]
    fn test_collaborate_ladder() {
        let (config, mut state) = with_energy(7);
        assert_eq!(apply_action(&mut state, &config, ActionId::Collaborate), 4);
        assert_eq!(state.energy, 6);
        assert_eq!(apply_action(&mut state, &config, ActionId::Collaborate), 2);
        assert_eq!(state.energy, 5);
        assert_eq!(state.collaborative.completed, 6);
        assert_eq!(state.daily_teaching_completed, 0);
    }

    #[test]
    fn test_break_capped_at_daily_energy() {
        let (config, mut state) = with_energy(13);
        apply_action(&mut state, &config, ActionId::Break);
        assert_eq!(state.energy, 14);

        let (config, mut state) = with_energy(0);
        apply_action(&mut state, &config, ActionId::Break);
        assert_eq!(state.energy, 2);
        assert_eq!(state.result_message.as_deref(), Some("Took a break. Energy: +2"));
    }

    #[test]
    fn test_meeting_choices() {
        let (config, mut state) = with_energy(5);
        apply_action(&mut state, &config, ActionId::AttendMeeting);
        assert_eq!(state.energy, 4);
        assert_eq!(state.penalties.meetings, 0);

        apply_action(&mut state, &config, ActionId::SkipMeeting);
        assert_eq!(state.energy, 4);
        assert_eq!(state.penalties.meetings, 1);
    }

    #[test]
    fn test_single_unit_message_is_singular() {
        let (config, mut state) = with_energy(3);
        apply_action(&mut state, &config, ActionId::Teach);
        assert_eq!(state.result_message.as_deref(), Some("Taught 1 module. Energy: -2"));
    }
}
