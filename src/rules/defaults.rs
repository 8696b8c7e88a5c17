//! The standard game rules, in evaluation order

use crate::core::config::GameConfig;
use crate::core::types::{ActionId, Phase, GENERIC_DISRUPTION_MESSAGE};
use crate::rules::rule::{Rule, RuleSet};
use crate::state::SimulationState;

pub const STAFF_MEETING_SCHEDULED: &str = "staff_meeting_scheduled";
pub const DISRUPTION_ACTIVE: &str = "disruption_active";
pub const ENERGY_DEPLETED: &str = "energy_depleted";
pub const END_OF_DAY_ADMIN: &str = "end_of_day_admin";
pub const END_OF_DAY_TEACHING: &str = "end_of_day_teaching";
pub const END_GAME_COLLABORATIVE: &str = "end_game_collaborative";

pub const STAFF_MEETING_MESSAGE: &str = "Staff meeting scheduled. Attendance expected.";

/// Standard rules; the selection rules run after the computed action list
/// and overwrite it
pub fn standard_rules() -> Vec<Rule> {
    vec![
        Rule::new(
            STAFF_MEETING_SCHEDULED,
            Some(Phase::Selection),
            staff_meeting_due,
            require_meeting_choice,
        ),
        Rule::new(
            DISRUPTION_ACTIVE,
            Some(Phase::Result),
            disruption_pending,
            block_action,
        ),
        Rule::new(
            ENERGY_DEPLETED,
            Some(Phase::Selection),
            energy_exhausted,
            force_break,
        ),
        Rule::new(
            END_OF_DAY_ADMIN,
            Some(Phase::Result),
            admin_left_at_day_end,
            compound_admin,
        ),
        Rule::new(
            END_OF_DAY_TEACHING,
            Some(Phase::Result),
            teaching_short_at_day_end,
            penalise_teaching,
        ),
        Rule::new(
            END_GAME_COLLABORATIVE,
            Some(Phase::Result),
            collaboration_short_at_game_end,
            penalise_collaboration,
        ),
    ]
}

impl RuleSet {
    pub fn standard() -> Self {
        Self {
            rules: standard_rules(),
        }
    }
}

fn staff_meeting_due(state: &SimulationState, config: &GameConfig) -> bool {
    state.is_staff_meeting_round(config, state.current_round_id)
}

fn require_meeting_choice(state: &mut SimulationState, _config: &GameConfig) {
    state.available_actions = vec![ActionId::AttendMeeting, ActionId::SkipMeeting];
    state.mandatory_action = Some(ActionId::AttendMeeting);
    state.special_message = Some(STAFF_MEETING_MESSAGE.to_string());
}

fn disruption_pending(state: &SimulationState, _config: &GameConfig) -> bool {
    state.current_disruption.is_some()
}

fn block_action(state: &mut SimulationState, _config: &GameConfig) {
    state.action_success = false;
    let message = state
        .current_disruption
        .map(|kind| kind.message())
        .unwrap_or(GENERIC_DISRUPTION_MESSAGE);
    state.disruption_message = Some(message.to_string());
}

fn energy_exhausted(state: &SimulationState, _config: &GameConfig) -> bool {
    state.energy == 0
}

fn force_break(state: &mut SimulationState, _config: &GameConfig) {
    state.available_actions = vec![ActionId::Break];
    state.force_break = true;
}

fn admin_left_at_day_end(state: &SimulationState, _config: &GameConfig) -> bool {
    state.is_end_of_day && state.admin.remaining > 0
}

fn compound_admin(state: &mut SimulationState, config: &GameConfig) {
    let compounding = &config.admin_compounding;
    if compounding.enabled {
        state.admin.remaining = state.admin.remaining.saturating_mul(compounding.multiplier);
    }
    if state.admin.remaining > config.penalties.admin_max_end_of_day {
        state.penalties.admin = state.penalties.admin.saturating_add(1);
    }
}

fn teaching_short_at_day_end(state: &SimulationState, config: &GameConfig) -> bool {
    state.is_end_of_day && state.daily_teaching_completed < config.penalties.teaching_min_per_day
}

fn penalise_teaching(state: &mut SimulationState, _config: &GameConfig) {
    state.penalties.teaching = state.penalties.teaching.saturating_add(1);
}

fn collaboration_short_at_game_end(state: &SimulationState, config: &GameConfig) -> bool {
    state.is_game_end && state.collaborative.completed < config.penalties.collaborative_min_total
}

fn penalise_collaboration(state: &mut SimulationState, _config: &GameConfig) {
    state.penalties.collaborative = state.penalties.collaborative.saturating_add(1);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::DisruptionKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fixture() -> (GameConfig, SimulationState, RuleSet) {
        let config = GameConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let state = SimulationState::new(&config, &mut rng);
        (config, state, RuleSet::standard())
    }

    #[test]
    fn test_standard_rule_order() {
        assert_eq!(
            RuleSet::standard().names(),
            vec![
                STAFF_MEETING_SCHEDULED,
                DISRUPTION_ACTIVE,
                ENERGY_DEPLETED,
                END_OF_DAY_ADMIN,
                END_OF_DAY_TEACHING,
                END_GAME_COLLABORATIVE,
            ]
        );
    }

    #[test]
    fn test_standard_rule_names_are_unique() {
        let rules = RuleSet::from_rules(standard_rules()).unwrap();
        assert_eq!(rules.len(), RuleSet::standard().len());
    }

    #[test]
    fn test_meeting_round_offers_attend_or_skip() {
        let (config, mut state, rules) = fixture();
        state.current_round_id = 11;
        let fired = rules.evaluate(&mut state, &config, Phase::Selection);
        assert_eq!(fired, vec![STAFF_MEETING_SCHEDULED]);
        assert_eq!(
            state.available_actions,
            vec![ActionId::AttendMeeting, ActionId::SkipMeeting]
        );
        assert_eq!(state.mandatory_action, Some(ActionId::AttendMeeting));
    }

    #[test]
    fn test_depleted_energy_overrides_meeting() {
        let (config, mut state, rules) = fixture();
        state.current_round_id = 11;
        state.energy = 0;
        rules.evaluate(&mut state, &config, Phase::Selection);
        assert_eq!(state.available_actions, vec![ActionId::Break]);
        assert!(state.force_break);
    }

    #[test]
    fn test_disruption_sets_message_and_blocks() {
        let (config, mut state, rules) = fixture();
        state.current_disruption = Some(DisruptionKind::GuestLecture);
        rules.evaluate(&mut state, &config, Phase::Result);
        assert!(!state.action_success);
        assert_eq!(
            state.disruption_message.as_deref(),
            Some("Unexpected guest lecture! Plans changed.")
        );
    }

    #[test]
    fn test_admin_compounds_and_penalises_over_cap() {
        let (config, mut state, rules) = fixture();
        state.is_end_of_day = true;
        state.daily_teaching_completed = 10;
        state.admin.remaining = 5;
        rules.evaluate(&mut state, &config, Phase::Result);
        assert_eq!(state.admin.remaining, 10);
        assert_eq!(state.penalties.admin, 1);
        assert_eq!(state.penalties.teaching, 0);
    }

    #[test]
    fn test_admin_at_cap_is_not_penalised() {
        let (config, mut state, rules) = fixture();
        state.is_end_of_day = true;
        state.daily_teaching_completed = 10;
        state.admin.remaining = 4;
        rules.evaluate(&mut state, &config, Phase::Result);
        assert_eq!(state.admin.remaining, 8);
        assert_eq!(state.penalties.admin, 0);
    }

    #[test]
    fn test_cleared_admin_does_not_compound() {
        let (config, mut state, rules) = fixture();
        state.is_end_of_day = true;
        state.admin.remaining = 0;
        let fired = rules.evaluate(&mut state, &config, Phase::Result);
        assert!(!fired.contains(&END_OF_DAY_ADMIN));
        assert_eq!(state.admin.remaining, 0);
    }

    #[test]
    fn test_compounding_disabled_still_checks_cap() {
        let (mut config, mut state, rules) = fixture();
        config.admin_compounding.enabled = false;
        state.is_end_of_day = true;
        state.admin.remaining = 9;
        rules.evaluate(&mut state, &config, Phase::Result);
        assert_eq!(state.admin.remaining, 9);
        assert_eq!(state.penalties.admin, 1);
    }

    #[test]
    fn test_teaching_minimum_checked_only_at_day_end() {
        let (config, mut state, rules) = fixture();
        state.daily_teaching_completed = 2;
        rules.evaluate(&mut state, &config, Phase::Result);
        assert_eq!(state.penalties.teaching, 0);

        state.is_end_of_day = true;
        rules.evaluate(&mut state, &config, Phase::Result);
        assert_eq!(state.penalties.teaching, 1);
    }

    #[test]
    fn test_collaboration_minimum_checked_at_game_end() {
        let (config, mut state, rules) = fixture();
        state.is_game_end = true;
        state.collaborative.completed = 9;
        rules.evaluate(&mut state, &config, Phase::Result);
        assert_eq!(state.penalties.collaborative, 1);

        state.penalties.collaborative = 0;
        state.collaborative.completed = 10;
        rules.evaluate(&mut state, &config, Phase::Result);
        assert_eq!(state.penalties.collaborative, 0);
    }
}
