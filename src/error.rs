use thiserror::Error;

use crate::Phase;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error(transparent)]
    Rules(#[from] blackjack::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Card script must contain at least one card")]
    EmptyScript,

    #[error("No player turn in progress (phase: {0:?})")]
    NotPlayerTurn(Phase),
}

impl From<serde_json::Error> for EnvError {
    fn from(e: serde_json::Error) -> Self {
        EnvError::InvalidConfig(e.to_string())
    }
}
