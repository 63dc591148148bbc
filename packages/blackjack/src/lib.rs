//! Blackjack as a finite-state Markov process.
//!
//! Hands are compressed into a closed set of states and every rule of the
//! game is a precomputed table over them: the hit transitions, the stand
//! resolution, the dealer's policy and the payout matrix.
mod card;
mod dealer;
mod error;
mod hand;
mod payout;
mod rules;
mod strategy;
mod transition;
#[cfg(feature = "edge")]
mod edge;

pub use card::Card;
pub use dealer::{Action, DealerPolicy, DealerRule};
pub use error::Error;
pub use hand::{Count, Hand, State};
pub use payout::{Matrix, Payout, PayoutRule, PayoutSpec};
pub use rules::{GameRules, Rules};
pub use strategy::{BasicStrategy, DealerMimic, PolicyTable, Strategy, Threshold};
pub use transition::{HitTable, StandTable};
#[cfg(feature = "edge")]
pub use edge::{DealerProbs, EdgeCalculator, EdgeResult};
