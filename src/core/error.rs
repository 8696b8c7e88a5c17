use thiserror::Error;

use crate::core::types::{ActionId, Phase};

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid action: {0} is not available this round")]
    InvalidAction(ActionId),

    #[error("Operation not allowed in {0:?} phase")]
    WrongPhase(Phase),

    #[error("Game is over, no further actions accepted")]
    GameOver,

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Rule already registered: {0}")]
    DuplicateRule(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
