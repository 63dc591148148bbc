use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Hand, State};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Action {
    Stand,
    Hit,
}

impl Action {
    pub const COUNT: usize = 2;
    pub const ALL: [Action; Action::COUNT] = [Action::Stand, Action::Hit];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Stand => "s",
            Action::Hit => "h",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// House rule for the dealer's soft 17.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DealerRule {
    #[default]
    #[serde(rename = "stands_on_17")]
    StandsOn17,
    #[serde(rename = "hits_on_soft_17")]
    HitsOnSoft17,
}

impl DealerRule {
    pub fn from_hits_soft_17(hits_soft_17: bool) -> Self {
        if hits_soft_17 {
            DealerRule::HitsOnSoft17
        } else {
            DealerRule::StandsOn17
        }
    }
}

/// Deterministic dealer play: one action per live hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealerPolicy {
    rule: DealerRule,
    cells: [Action; Hand::COUNT],
}

impl DealerPolicy {
    pub fn new(rule: DealerRule) -> Self {
        let mut cells = [Action::Hit; Hand::COUNT];
        for hand in Hand::ALL {
            cells[hand.index()] = Self::decide(rule, hand);
        }
        info!("built dealer policy: {rule:?}");
        Self { rule, cells }
    }

    pub fn rule(&self) -> DealerRule {
        self.rule
    }

    /// Finished hands always stand.
    pub fn act(&self, state: State) -> Action {
        match state {
            State::Live(hand) => self.cells[hand.index()],
            State::Done(_) => Action::Stand,
        }
    }

    fn decide(rule: DealerRule, hand: Hand) -> Action {
        match hand {
            Hand::S17 if rule == DealerRule::HitsOnSoft17 => Action::Hit,
            h if h.total() >= 17 => Action::Stand,
            _ => Action::Hit,
        }
    }
}
