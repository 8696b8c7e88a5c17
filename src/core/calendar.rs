//! Round/day arithmetic
//!
//! Rounds are numbered twice: within the day (`1..=rounds_per_day`) and
//! globally by round id (`1..=total_rounds`). The two are linked by
//! `round_id = (day - 1) * rounds_per_day + round`.

use serde::{Deserialize, Serialize};

use crate::core::types::RoundId;

/// Position of a round on the calendar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRound {
    pub day: u32,
    pub round: u32,
}

/// Converts between (day, round) pairs and global round ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundClock {
    rounds_per_day: u32,
}

impl RoundClock {
    pub fn new(rounds_per_day: u32) -> Self {
        Self {
            rounds_per_day: rounds_per_day.max(1),
        }
    }

    pub fn rounds_per_day(&self) -> u32 {
        self.rounds_per_day
    }

    /// Saturates at `RoundId::MAX` for out-of-range input
    pub fn round_id(&self, day: u32, round: u32) -> RoundId {
        day.saturating_sub(1)
            .saturating_mul(self.rounds_per_day)
            .saturating_add(round)
    }

    pub fn day_round(&self, round_id: RoundId) -> DayRound {
        let zero_based = round_id.saturating_sub(1);
        DayRound {
            day: zero_based / self.rounds_per_day + 1,
            round: zero_based % self.rounds_per_day + 1,
        }
    }

    /// Whether `round` is the last round of its day
    pub fn is_last_round_of_day(&self, round: u32) -> bool {
        round >= self.rounds_per_day
    }
}

impl Default for RoundClock {
    fn default() -> Self {
        Self::new(8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_id_from_day_and_round() {
        let clock = RoundClock::new(8);
        assert_eq!(clock.round_id(1, 1), 1);
        assert_eq!(clock.round_id(1, 8), 8);
        assert_eq!(clock.round_id(2, 1), 9);
        assert_eq!(clock.round_id(2, 3), 11);
        assert_eq!(clock.round_id(5, 8), 40);
    }

    #[test]
    fn test_day_round_inverts_round_id() {
        let clock = RoundClock::new(8);
        for round_id in 1..=40 {
            let DayRound { day, round } = clock.day_round(round_id);
            assert!((1..=8).contains(&round));
            assert_eq!(clock.round_id(day, round), round_id);
        }
        assert_eq!(clock.day_round(9), DayRound { day: 2, round: 1 });
    }

    #[test]
    fn test_last_round_of_day() {
        let clock = RoundClock::new(8);
        assert!(!clock.is_last_round_of_day(7));
        assert!(clock.is_last_round_of_day(8));
    }

    #[test]
    fn test_round_id_saturates() {
        let clock = RoundClock::new(8);
        assert_eq!(clock.round_id(u32::MAX, 2), RoundId::MAX);
    }

    #[test]
    fn test_zero_rounds_per_day_is_clamped() {
        let clock = RoundClock::new(0);
        assert_eq!(clock.rounds_per_day(), 1);
        assert_eq!(clock.round_id(3, 1), 3);
    }
}
