use crate::{Action, Card, DealerPolicy, DealerRule, Hand, State};

/// A player policy: what to do holding `player` against the dealer's upcard.
pub trait Strategy {
    fn act(&self, player: Hand, upcard: Card) -> Action;
}

impl<F> Strategy for F
where
    F: Fn(Hand, Card) -> Action,
{
    fn act(&self, player: Hand, upcard: Card) -> Action {
        self(player, upcard)
    }
}

/// Stand on any total at or above a fixed threshold, hit below it.
/// `Threshold::new(20)` is the policy evaluated in Sutton & Barto's Example 5.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Threshold {
    stand_at: u8,
}

impl Threshold {
    pub fn new(stand_at: u8) -> Self {
        Self { stand_at }
    }
}

impl Strategy for Threshold {
    fn act(&self, player: Hand, _upcard: Card) -> Action {
        if player.total() >= self.stand_at {
            Action::Stand
        } else {
            Action::Hit
        }
    }
}

/// Hit/stand part of the standard basic strategy chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BasicStrategy;

impl Strategy for BasicStrategy {
    fn act(&self, player: Hand, upcard: Card) -> Action {
        let player_value = player.total();
        // Charts count the dealer's ace as 11
        let dealer_value = if upcard.is_ace() { 11 } else { upcard.value() };

        if player.is_soft() {
            if player_value >= 19 {
                Action::Stand
            } else if player_value == 18 {
                if dealer_value >= 9 {
                    Action::Hit
                } else {
                    Action::Stand
                }
            } else {
                Action::Hit
            }
        } else if player_value >= 17 {
            Action::Stand
        } else if (13..=16).contains(&player_value) {
            if (2..=6).contains(&dealer_value) {
                Action::Stand
            } else {
                Action::Hit
            }
        } else if player_value == 12 {
            if (4..=6).contains(&dealer_value) {
                Action::Stand
            } else {
                Action::Hit
            }
        } else {
            Action::Hit
        }
    }
}

/// Play exactly like the dealer, ignoring the upcard.
#[derive(Debug, Clone)]
pub struct DealerMimic {
    policy: DealerPolicy,
}

impl DealerMimic {
    pub fn new(rule: DealerRule) -> Self {
        Self {
            policy: DealerPolicy::new(rule),
        }
    }
}

impl Strategy for DealerMimic {
    fn act(&self, player: Hand, _upcard: Card) -> Action {
        self.policy.act(State::Live(player))
    }
}

/// An explicit action for every (hand, upcard) pair, e.g. a learned greedy
/// policy. Starts out standing everywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    cells: [[Action; Card::COUNT]; Hand::COUNT],
}

impl PolicyTable {
    pub fn new() -> Self {
        Self {
            cells: [[Action::Stand; Card::COUNT]; Hand::COUNT],
        }
    }

    pub fn from_strategy(strategy: &impl Strategy) -> Self {
        let mut table = Self::new();
        for hand in Hand::ALL {
            for card in Card::ALL {
                table.set(hand, card, strategy.act(hand, card));
            }
        }
        table
    }

    pub fn set(&mut self, player: Hand, upcard: Card, action: Action) {
        self.cells[player.index()][upcard.index()] = action;
    }

    /// Number of decision states where the two tables disagree.
    pub fn disagreements(&self, other: &PolicyTable) -> usize {
        Hand::DECISIONS
            .iter()
            .flat_map(|&hand| Card::ALL.into_iter().map(move |card| (hand, card)))
            .filter(|&(hand, card)| self.act(hand, card) != other.act(hand, card))
            .count()
    }

    /// One row per decision state, one column per upcard.
    pub fn render(&self) -> String {
        let mut out = String::from("     ");
        for card in Card::ALL {
            out.push_str(&format!("{card:>2}"));
        }
        out.push('\n');
        for hand in Hand::DECISIONS {
            out.push_str(&format!("{hand:>4} "));
            for card in Card::ALL {
                out.push_str(&format!("{:>2}", self.act(hand, card)));
            }
            out.push('\n');
        }
        out
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for PolicyTable {
    fn act(&self, player: Hand, upcard: Card) -> Action {
        self.cells[player.index()][upcard.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_twenty() {
        let policy = Threshold::new(20);
        assert_eq!(policy.act(Hand::H19, Card::Ten), Action::Hit);
        assert_eq!(policy.act(Hand::S19, Card::Ten), Action::Hit);
        assert_eq!(policy.act(Hand::H20, Card::Two), Action::Stand);
        assert_eq!(policy.act(Hand::S21, Card::Ace), Action::Stand);
        assert_eq!(policy.act(Hand::BJ, Card::Ace), Action::Stand);
    }

    #[test]
    fn test_basic_strategy_hard_hands() {
        let basic = BasicStrategy;
        assert_eq!(basic.act(Hand::H16, Card::Six), Action::Stand);
        assert_eq!(basic.act(Hand::H16, Card::Seven), Action::Hit);
        assert_eq!(basic.act(Hand::H12, Card::Three), Action::Hit);
        assert_eq!(basic.act(Hand::H12, Card::Four), Action::Stand);
        assert_eq!(basic.act(Hand::H17, Card::Ace), Action::Stand);
        assert_eq!(basic.act(Hand::H11, Card::Six), Action::Hit);
        assert_eq!(basic.act(Hand::T, Card::Six), Action::Hit);
    }

    #[test]
    fn test_basic_strategy_soft_hands() {
        let basic = BasicStrategy;
        assert_eq!(basic.act(Hand::S18, Card::Eight), Action::Stand);
        assert_eq!(basic.act(Hand::S18, Card::Nine), Action::Hit);
        assert_eq!(basic.act(Hand::S18, Card::Ace), Action::Hit);
        assert_eq!(basic.act(Hand::S17, Card::Two), Action::Hit);
        assert_eq!(basic.act(Hand::S19, Card::Ten), Action::Stand);
        assert_eq!(basic.act(Hand::BJ, Card::Ten), Action::Stand);
    }

    #[test]
    fn test_dealer_mimic() {
        let mimic = DealerMimic::new(DealerRule::HitsOnSoft17);
        assert_eq!(mimic.act(Hand::S17, Card::Two), Action::Hit);
        assert_eq!(mimic.act(Hand::H17, Card::Two), Action::Stand);
        assert_eq!(mimic.act(Hand::H16, Card::Two), Action::Hit);
    }

    #[test]
    fn test_closures_are_strategies() {
        let always_hit = |_: Hand, _: Card| Action::Hit;
        assert_eq!(always_hit.act(Hand::H20, Card::Ten), Action::Hit);
    }

    #[test]
    fn test_policy_table_from_strategy() {
        let table = PolicyTable::from_strategy(&BasicStrategy);
        for hand in Hand::ALL {
            for card in Card::ALL {
                assert_eq!(table.act(hand, card), BasicStrategy.act(hand, card));
            }
        }
        assert_eq!(table.disagreements(&table), 0);
        assert!(table.disagreements(&PolicyTable::new()) > 0);
    }

    #[test]
    fn test_policy_table_render() {
        let table = PolicyTable::from_strategy(&Threshold::new(17));
        let grid = table.render();
        assert_eq!(grid.lines().count(), 1 + Hand::DECISIONS.len());
        assert!(grid.lines().next().unwrap().ends_with(" T A"));
        assert!(grid.contains(" H16  h h h h h h h h h h"));
        assert!(grid.contains(" H17  s s s s s s s s s s"));
    }
}
