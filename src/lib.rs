//! A reinforcement-learning environment for blackjack built on the rule
//! tables of the `blackjack` crate.
mod config;
mod deck;
mod env;
mod error;

pub use config::EnvConfig;
pub use deck::{CardSource, InfiniteDeck, ScriptedDeck};
pub use env::{BlackjackEnv, Dealer, Info, Observation, Phase, Space, Step};
pub use error::EnvError;

pub use blackjack;
