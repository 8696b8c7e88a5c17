//! Game configuration with documented constants
//!
//! Every number the engine uses lives here. The defaults reproduce the
//! standard five-day game; a TOML file can override any section.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::calendar::RoundClock;
use crate::core::error::{GameError, Result};
use crate::core::types::{DisruptionKind, RoundId};

/// Complete configuration for one game
///
/// Loaded once at start-up and handed to the engine by value. Nothing in
/// the simulation mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GameConfig {
    pub structure: StructureConfig,
    pub fixed_events: FixedEventsConfig,
    pub initial_tasks: InitialTasksConfig,
    pub task_rates: TaskRatesConfig,
    pub energy: EnergyConfig,
    pub disruptions: DisruptionConfig,
    pub penalties: PenaltyConfig,
    pub admin_compounding: AdminCompoundingConfig,
}

/// Length of the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    /// Rounds in the whole game; must equal `rounds_per_day * total_days`
    pub total_rounds: u32,
    pub rounds_per_day: u32,
    pub total_days: u32,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            total_rounds: 40,
            rounds_per_day: 8,
            total_days: 5,
        }
    }
}

/// A statically scheduled staff meeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedEvent {
    pub day: u32,
    pub round: u32,
}

impl FixedEvent {
    pub fn round_id(&self, clock: &RoundClock) -> RoundId {
        clock.round_id(self.day, self.round)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedEventsConfig {
    pub staff_meetings: Vec<FixedEvent>,
}

impl Default for FixedEventsConfig {
    fn default() -> Self {
        Self {
            staff_meetings: vec![
                FixedEvent { day: 2, round: 3 },
                FixedEvent { day: 3, round: 4 },
                FixedEvent { day: 5, round: 6 },
            ],
        }
    }
}

/// Starting size of each task pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialTasksConfig {
    /// Teaching modules for the whole game
    pub teaching_modules: u32,
    /// Collaborative units for the whole game
    pub collaborative_units: u32,
    /// Admin units at game start, and added again at every day boundary
    pub admin_units_per_day: u32,
}

impl Default for InitialTasksConfig {
    fn default() -> Self {
        Self {
            teaching_modules: 80,
            collaborative_units: 20,
            admin_units_per_day: 4,
        }
    }
}

/// One step of an energy ladder: strictly more than `above` energy yields `units`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LadderTier {
    pub above: u32,
    pub units: u32,
}

/// Threshold table mapping current energy to task units
///
/// Tiers are checked top-down; the first whose threshold is exceeded wins.
/// `otherwise` applies when no tier matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnergyLadder {
    pub tiers: Vec<LadderTier>,
    #[serde(default)]
    pub otherwise: u32,
}

impl EnergyLadder {
    pub fn new(tiers: &[(u32, u32)], otherwise: u32) -> Self {
        Self {
            tiers: tiers
                .iter()
                .map(|&(above, units)| LadderTier { above, units })
                .collect(),
            otherwise,
        }
    }

    pub fn units_for(&self, energy: u32) -> u32 {
        self.tiers
            .iter()
            .find(|tier| energy > tier.above)
            .map(|tier| tier.units)
            .unwrap_or(self.otherwise)
    }

    fn is_descending(&self) -> bool {
        self.tiers.windows(2).all(|w| w[0].above > w[1].above)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRatesConfig {
    pub teaching: EnergyLadder,
    pub admin: EnergyLadder,
    pub collaborative: EnergyLadder,
}

impl Default for TaskRatesConfig {
    fn default() -> Self {
        Self {
            teaching: EnergyLadder::new(&[(9, 3), (5, 2), (0, 1)], 0),
            admin: EnergyLadder::new(&[(8, 4), (0, 2)], 0),
            collaborative: EnergyLadder::new(&[(6, 4)], 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyCosts {
    pub teaching: u32,
    pub admin: u32,
    pub collaborative: u32,
    pub meeting: u32,
}

impl Default for EnergyCosts {
    fn default() -> Self {
        Self {
            teaching: 2,
            admin: 2,
            collaborative: 1,
            meeting: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyGains {
    #[serde(rename = "break")]
    pub rest: u32,
}

impl Default for EnergyGains {
    fn default() -> Self {
        Self { rest: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnergyConfig {
    /// Energy at the start of every day, and the daily ceiling
    pub daily_start: u32,
    pub costs: EnergyCosts,
    pub gains: EnergyGains,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            daily_start: 14,
            costs: EnergyCosts::default(),
            gains: EnergyGains::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisruptionConfig {
    /// Number of disrupted rounds drawn per game (never round 1)
    pub total: u32,
    /// Catalog a disrupted round draws its kind from
    pub types: Vec<DisruptionKind>,
}

impl Default for DisruptionConfig {
    fn default() -> Self {
        Self {
            total: 3,
            types: vec![
                DisruptionKind::TechFailure,
                DisruptionKind::StudentEmergency,
                DisruptionKind::GuestLecture,
                DisruptionKind::EventPractice,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyConfig {
    /// Teaching units that must be completed each day
    pub teaching_min_per_day: u32,
    /// Collaborative units that must be completed over the whole game
    pub collaborative_min_total: u32,
    /// Admin backlog allowed after end-of-day compounding
    pub admin_max_end_of_day: u32,
    /// Penalty points for skipping a staff meeting
    pub skip_meeting: u32,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            teaching_min_per_day: 10,
            collaborative_min_total: 10,
            admin_max_end_of_day: 8,
            skip_meeting: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminCompoundingConfig {
    pub enabled: bool,
    pub multiplier: u32,
}

impl Default for AdminCompoundingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            multiplier: 2,
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn clock(&self) -> RoundClock {
        RoundClock::new(self.structure.rounds_per_day)
    }

    /// Round ids of every configured staff meeting
    pub fn meeting_round_ids(&self) -> Vec<RoundId> {
        let clock = self.clock();
        self.fixed_events
            .staff_meetings
            .iter()
            .map(|m| m.round_id(&clock))
            .collect()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let s = &self.structure;
        if s.rounds_per_day == 0 || s.total_days == 0 {
            return Err(GameError::InvalidConfig(
                "rounds_per_day and total_days must be positive".into(),
            ));
        }
        let expected = s.rounds_per_day.checked_mul(s.total_days).ok_or_else(|| {
            GameError::InvalidConfig(format!(
                "rounds_per_day ({}) * total_days ({}) is too large",
                s.rounds_per_day, s.total_days
            ))
        })?;
        if s.total_rounds != expected {
            return Err(GameError::InvalidConfig(format!(
                "total_rounds ({}) should equal rounds_per_day * total_days ({})",
                s.total_rounds, expected
            )));
        }

        for meeting in &self.fixed_events.staff_meetings {
            if meeting.day == 0
                || meeting.day > s.total_days
                || meeting.round == 0
                || meeting.round > s.rounds_per_day
            {
                return Err(GameError::InvalidConfig(format!(
                    "staff meeting at day {} round {} is outside the calendar",
                    meeting.day, meeting.round
                )));
            }
        }

        let ladders = [
            ("teaching", &self.task_rates.teaching),
            ("admin", &self.task_rates.admin),
            ("collaborative", &self.task_rates.collaborative),
        ];
        for (name, ladder) in ladders {
            if !ladder.is_descending() {
                return Err(GameError::InvalidConfig(format!(
                    "{} ladder thresholds must be strictly descending",
                    name
                )));
            }
        }

        if self.admin_compounding.enabled && self.admin_compounding.multiplier == 0 {
            return Err(GameError::InvalidConfig(
                "admin compounding multiplier must be at least 1".into(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn test_teaching_ladder_thresholds() {
        let ladder = &GameConfig::default().task_rates.teaching;
        assert_eq!(ladder.units_for(14), 3);
        assert_eq!(ladder.units_for(10), 3);
        assert_eq!(ladder.units_for(9), 2);
        assert_eq!(ladder.units_for(7), 2);
        assert_eq!(ladder.units_for(5), 1);
        assert_eq!(ladder.units_for(3), 1);
        assert_eq!(ladder.units_for(0), 0);
    }

    #[test]
    fn test_collaborative_ladder_has_floor() {
        let ladder = &GameConfig::default().task_rates.collaborative;
        assert_eq!(ladder.units_for(7), 4);
        assert_eq!(ladder.units_for(6), 2);
        assert_eq!(ladder.units_for(0), 2);
    }

    #[test]
    fn test_meeting_round_ids() {
        assert_eq!(GameConfig::default().meeting_round_ids(), vec![11, 20, 38]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = GameConfig::from_toml_str(
            r#"
            [energy]
            daily_start = 20

            [disruptions]
            total = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.energy.daily_start, 20);
        assert_eq!(config.energy.costs.teaching, 2);
        assert_eq!(config.disruptions.total, 5);
        assert_eq!(config.disruptions.types.len(), 4);
        assert_eq!(config.structure, StructureConfig::default());
    }

    #[test]
    fn test_inconsistent_round_count_rejected() {
        let mut config = GameConfig::default();
        config.structure.total_rounds = 41;
        assert!(matches!(config.validate(), Err(GameError::InvalidConfig(_))));
    }

    #[test]
    fn test_oversized_calendar_rejected() {
        let err = GameConfig::from_toml_str(
            "[structure]\ntotal_rounds = 1\nrounds_per_day = 100000\ntotal_days = 100000\n",
        )
        .unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
    }

    #[test]
    fn test_meeting_outside_calendar_rejected() {
        let mut config = GameConfig::default();
        config.fixed_events.staff_meetings.push(FixedEvent { day: 6, round: 1 });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ascending_ladder_rejected() {
        let mut config = GameConfig::default();
        config.task_rates.admin = EnergyLadder::new(&[(0, 2), (8, 4)], 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let config = GameConfig::load(Path::new("data/default_game.toml"))
            .expect("Should load shipped config");
        assert_eq!(config, GameConfig::default());
    }
}
