use std::path::Path;

use blackjack::GameRules;
use serde::{Deserialize, Serialize};

use crate::{EnvError, InfiniteDeck};

/// Environment configuration, e.g.
/// `{"payout": "thorp", "dealer": "hits_on_soft_17", "seed": 7}`.
///
/// `payout` also accepts a full 8x8 matrix of rewards.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    #[serde(flatten)]
    pub rules: GameRules,

    /// Seed for the default infinite deck; unseeded draws from entropy
    pub seed: Option<u64>,
}

impl EnvConfig {
    pub fn from_json(json: &str) -> Result<Self, EnvError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, EnvError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn deck(&self) -> InfiniteDeck {
        match self.seed {
            Some(seed) => InfiniteDeck::seeded(seed),
            None => InfiniteDeck::from_entropy(),
        }
    }
}
