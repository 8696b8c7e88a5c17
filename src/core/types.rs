//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Round identifier, unique across the whole game (1-based)
pub type RoundId = u32;

/// Phase of the round life cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Selection,
    Result,
    End,
}

/// Task pools the player works down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Teaching,
    Admin,
    Collaborative,
}

/// Unique action identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    Teach,
    Admin,
    Collaborate,
    Break,
    AttendMeeting,
    SkipMeeting,
}

impl ActionId {
    pub const ALL: [ActionId; 6] = [
        ActionId::Teach,
        ActionId::Admin,
        ActionId::Collaborate,
        ActionId::Break,
        ActionId::AttendMeeting,
        ActionId::SkipMeeting,
    ];

    /// The task pool an action draws from, if any
    pub fn category(&self) -> Option<TaskCategory> {
        match self {
            ActionId::Teach => Some(TaskCategory::Teaching),
            ActionId::Admin => Some(TaskCategory::Admin),
            ActionId::Collaborate => Some(TaskCategory::Collaborative),
            ActionId::Break | ActionId::AttendMeeting | ActionId::SkipMeeting => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActionId::Teach => "teach",
            ActionId::Admin => "admin",
            ActionId::Collaborate => "collaborate",
            ActionId::Break => "break",
            ActionId::AttendMeeting => "attend_meeting",
            ActionId::SkipMeeting => "skip_meeting",
        }
    }

    /// Short player-facing label
    pub fn label(&self) -> &'static str {
        match self {
            ActionId::Teach => "Teach",
            ActionId::Admin => "Admin",
            ActionId::Collaborate => "Collab",
            ActionId::Break => "Break",
            ActionId::AttendMeeting => "Meeting",
            ActionId::SkipMeeting => "Skip Meeting",
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActionId::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown action '{}'", s))
    }
}

/// Kinds of random disruption that can block a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisruptionKind {
    TechFailure,
    StudentEmergency,
    GuestLecture,
    EventPractice,
}

/// Shown when a disruption fires without a known kind
pub const GENERIC_DISRUPTION_MESSAGE: &str = "An unexpected disruption occurred!";

impl DisruptionKind {
    pub fn message(&self) -> &'static str {
        match self {
            DisruptionKind::TechFailure => "Technology failure! Your action was disrupted.",
            DisruptionKind::StudentEmergency => "Student emergency occurred! Action interrupted.",
            DisruptionKind::GuestLecture => "Unexpected guest lecture! Plans changed.",
            DisruptionKind::EventPractice => "Event practice required! Time redirected.",
        }
    }
}
