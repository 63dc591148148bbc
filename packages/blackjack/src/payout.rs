use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{Count, Error};

/// Reward for every (player outcome, dealer outcome) pair, indexed by [`Count`].
pub type Matrix = [[f64; Count::COUNT]; Count::COUNT];

/// The named payout structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PayoutRule {
    /// Sutton & Barto, "Reinforcement Learning" (2018): a natural beats 21
    /// and pays even money.
    #[default]
    SuttonBarto,
    /// Gym's Blackjack-v0: a natural ties with 21.
    BlackjackV0,
    /// Blackjack-v0 with `natural=True`: a winning natural pays 3:2.
    BlackjackV0Natural,
    /// E.O. Thorp, "Beat the Dealer" (1966): casino payouts, a winning
    /// natural pays 3:2.
    Thorp,
}

impl PayoutRule {
    pub const ALL: [PayoutRule; 4] = [
        PayoutRule::SuttonBarto,
        PayoutRule::BlackjackV0,
        PayoutRule::BlackjackV0Natural,
        PayoutRule::Thorp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PayoutRule::SuttonBarto => "sutton-barto",
            PayoutRule::BlackjackV0 => "blackjack-v0",
            PayoutRule::BlackjackV0Natural => "blackjack-v0-natural",
            PayoutRule::Thorp => "thorp",
        }
    }

    pub fn matrix(self) -> Matrix {
        match self {
            PayoutRule::SuttonBarto => sutton_barto(),
            PayoutRule::BlackjackV0 => blackjack_v0(),
            PayoutRule::BlackjackV0Natural => {
                let mut m = blackjack_v0();
                for dealer in 0..Count::TwentyOne.index() {
                    m[Count::Blackjack.index()][dealer] = 1.5;
                }
                m
            }
            PayoutRule::Thorp => {
                let mut m = sutton_barto();
                for dealer in 0..Count::Blackjack.index() {
                    m[Count::Blackjack.index()][dealer] = 1.5;
                }
                m
            }
        }
    }
}

impl FromStr for PayoutRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .into_iter()
            .find(|rule| rule.name() == lower)
            .ok_or_else(|| Error::UnknownPayout(s.to_string()))
    }
}

impl fmt::Display for PayoutRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn sutton_barto() -> Matrix {
    let mut m = [[0.0; Count::COUNT]; Count::COUNT];
    for player in Count::ALL {
        for dealer in Count::ALL {
            m[player.index()][dealer.index()] = if player == Count::Bust {
                -1.0
            } else if dealer == Count::Bust {
                1.0
            } else {
                match player.cmp(&dealer) {
                    Ordering::Greater => 1.0,
                    Ordering::Less => -1.0,
                    Ordering::Equal => 0.0,
                }
            };
        }
    }
    m
}

fn blackjack_v0() -> Matrix {
    let mut m = sutton_barto();
    m[Count::Blackjack.index()][Count::TwentyOne.index()] = 0.0;
    m[Count::TwentyOne.index()][Count::Blackjack.index()] = 0.0;
    m
}

/// How a payout structure is selected in configuration: by name, or as a
/// full matrix of rewards (rows are player outcomes).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayoutSpec {
    Named(String),
    Custom(Vec<Vec<f64>>),
}

impl Default for PayoutSpec {
    fn default() -> Self {
        PayoutSpec::Named(PayoutRule::default().name().to_string())
    }
}

impl From<PayoutRule> for PayoutSpec {
    fn from(rule: PayoutRule) -> Self {
        PayoutSpec::Named(rule.name().to_string())
    }
}

/// A validated payout matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Payout {
    matrix: Matrix,
    rule: Option<PayoutRule>,
}

impl Payout {
    pub fn named(rule: PayoutRule) -> Self {
        Self {
            matrix: rule.matrix(),
            rule: Some(rule),
        }
    }

    pub fn from_name(name: &str) -> Result<Self, Error> {
        Ok(Self::named(name.parse()?))
    }

    pub fn custom(rows: &[Vec<f64>]) -> Result<Self, Error> {
        if rows.len() != Count::COUNT {
            return Err(Error::PayoutShape {
                rows: rows.len(),
                cols: rows.first().map_or(0, Vec::len),
            });
        }
        let mut matrix = [[0.0; Count::COUNT]; Count::COUNT];
        for (i, row) in rows.iter().enumerate() {
            if row.len() != Count::COUNT {
                return Err(Error::PayoutShape {
                    rows: rows.len(),
                    cols: row.len(),
                });
            }
            for (j, &reward) in row.iter().enumerate() {
                if !reward.is_finite() {
                    return Err(Error::NonFinitePayout { row: i, col: j });
                }
                matrix[i][j] = reward;
            }
        }
        Ok(Self { matrix, rule: None })
    }

    pub fn from_spec(spec: &PayoutSpec) -> Result<Self, Error> {
        match spec {
            PayoutSpec::Named(name) => Self::from_name(name),
            PayoutSpec::Custom(rows) => Self::custom(rows),
        }
    }

    /// The named rule this matrix came from, `None` for custom matrices.
    pub fn rule(&self) -> Option<PayoutRule> {
        self.rule
    }

    pub fn get(&self, player: Count, dealer: Count) -> f64 {
        self.matrix[player.index()][dealer.index()]
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Smallest and largest reward.
    pub fn range(&self) -> (f64, f64) {
        self.matrix
            .iter()
            .flatten()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                (lo.min(r), hi.max(r))
            })
    }
}

impl Default for Payout {
    fn default() -> Self {
        Self::named(PayoutRule::default())
    }
}
