use serde::{Deserialize, Serialize};
use std::fmt;

/// A live hand, compressed to the information that determines every future
/// transition: its total, whether an ace is still counted as 11, and the two
/// single-card states that can still become a natural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Hand {
    Deal,
    H2,
    H3,
    H4,
    H5,
    H6,
    H7,
    H8,
    H9,
    H10,
    H11,
    H12,
    H13,
    H14,
    H15,
    H16,
    H17,
    H18,
    H19,
    H20,
    H21,
    T,
    A,
    S12,
    S13,
    S14,
    S15,
    S16,
    S17,
    S18,
    S19,
    S20,
    S21,
    BJ,
}

// Index of the lowest hard and soft totals.
const HARD_BASE: usize = Hand::H2 as usize;
const SOFT_BASE: usize = Hand::S12 as usize;

impl Hand {
    pub const COUNT: usize = 34;

    #[rustfmt::skip]
    pub const ALL: [Hand; Hand::COUNT] = [
        Hand::Deal,
        Hand::H2, Hand::H3, Hand::H4, Hand::H5, Hand::H6, Hand::H7, Hand::H8, Hand::H9, Hand::H10, Hand::H11,
        Hand::H12, Hand::H13, Hand::H14, Hand::H15, Hand::H16, Hand::H17, Hand::H18, Hand::H19, Hand::H20, Hand::H21,
        Hand::T,
        Hand::A,
        Hand::S12, Hand::S13, Hand::S14, Hand::S15, Hand::S16, Hand::S17, Hand::S18, Hand::S19, Hand::S20, Hand::S21,
        Hand::BJ,
    ];

    /// Hands in which the player has a real choice after the opening deal:
    /// hard 4 through 20 and soft 12 through 20.
    #[rustfmt::skip]
    pub const DECISIONS: [Hand; 26] = [
        Hand::H4, Hand::H5, Hand::H6, Hand::H7, Hand::H8, Hand::H9, Hand::H10, Hand::H11, Hand::H12,
        Hand::H13, Hand::H14, Hand::H15, Hand::H16, Hand::H17, Hand::H18, Hand::H19, Hand::H20,
        Hand::S12, Hand::S13, Hand::S14, Hand::S15, Hand::S16, Hand::S17, Hand::S18, Hand::S19, Hand::S20,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Hard total `2..=21`.
    pub fn hard(total: u8) -> Option<Self> {
        match total {
            2..=21 => Self::from_index(total as usize - 2 + HARD_BASE),
            _ => None,
        }
    }

    /// Soft total `12..=21`.
    pub fn soft(total: u8) -> Option<Self> {
        match total {
            12..=21 => Self::from_index(total as usize - 12 + SOFT_BASE),
            _ => None,
        }
    }

    /// Numeric value with any soft ace counted as 11.
    pub fn total(self) -> u8 {
        match self {
            Hand::Deal => 0,
            Hand::T => 10,
            Hand::A => 11,
            Hand::BJ => 21,
            h if h <= Hand::H21 => (h.index() + 2 - HARD_BASE) as u8,
            s => (s.index() + 12 - SOFT_BASE) as u8,
        }
    }

    pub fn is_hard(self) -> bool {
        (Hand::H2..=Hand::H21).contains(&self)
    }

    /// An ace is counted as 11. The lone ace and the natural count as soft.
    pub fn is_soft(self) -> bool {
        matches!(self, Hand::A | Hand::BJ) || (Hand::S12..=Hand::S21).contains(&self)
    }

    pub fn label(self) -> &'static str {
        #[rustfmt::skip]
        const LABELS: [&str; Hand::COUNT] = [
            "DEAL",
            "H2", "H3", "H4", "H5", "H6", "H7", "H8", "H9", "H10", "H11",
            "H12", "H13", "H14", "H15", "H16", "H17", "H18", "H19", "H20", "H21",
            "T",
            "A",
            "S12", "S13", "S14", "S15", "S16", "S17", "S18", "S19", "S20", "S21",
            "BJ",
        ];
        LABELS[self.index()]
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Finalized outcome of one side once it stops drawing, ordered by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Count {
    Bust,
    /// Any total of 16 or less.
    Sixteen,
    Seventeen,
    Eighteen,
    Nineteen,
    Twenty,
    TwentyOne,
    Blackjack,
}

impl Count {
    pub const COUNT: usize = 8;

    pub const ALL: [Count; Count::COUNT] = [
        Count::Bust,
        Count::Sixteen,
        Count::Seventeen,
        Count::Eighteen,
        Count::Nineteen,
        Count::Twenty,
        Count::TwentyOne,
        Count::Blackjack,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Category of a non-natural total.
    pub fn from_total(total: u8) -> Self {
        match total {
            0..=16 => Count::Sixteen,
            17 => Count::Seventeen,
            18 => Count::Eighteen,
            19 => Count::Nineteen,
            20 => Count::Twenty,
            21 => Count::TwentyOne,
            _ => Count::Bust,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Count::Bust => "BUST",
            Count::Sixteen => "16",
            Count::Seventeen => "17",
            Count::Eighteen => "18",
            Count::Nineteen => "19",
            Count::Twenty => "20",
            Count::TwentyOne => "21",
            Count::Blackjack => "BJ",
        }
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Either side of the table at any point of an episode.
///
/// Live hands keep drawing under the hit table; finished hands are absorbing.
/// The two alphabets only meet through [`crate::StandTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    Live(Hand),
    Done(Count),
}

impl State {
    pub const DEAL: State = State::Live(Hand::Deal);
    pub const BUST: State = State::Done(Count::Bust);

    pub fn is_bust(self) -> bool {
        self == State::BUST
    }

    pub fn is_absorbing(self) -> bool {
        matches!(self, State::Done(_))
    }

    pub fn hand(self) -> Option<Hand> {
        match self {
            State::Live(hand) => Some(hand),
            State::Done(_) => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            State::Live(hand) => hand.label(),
            State::Done(count) => count.label(),
        }
    }
}

impl From<Hand> for State {
    fn from(hand: Hand) -> Self {
        State::Live(hand)
    }
}

impl From<Count> for State {
    fn from(count: Count) -> Self {
        State::Done(count)
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_index_roundtrip() {
        for (i, hand) in Hand::ALL.iter().enumerate() {
            assert_eq!(hand.index(), i);
            assert_eq!(Hand::from_index(i), Some(*hand));
        }
        assert_eq!(Hand::from_index(Hand::COUNT), None);
    }

    #[test]
    fn test_hard_and_soft_constructors() {
        assert_eq!(Hand::hard(2), Some(Hand::H2));
        assert_eq!(Hand::hard(13), Some(Hand::H13));
        assert_eq!(Hand::hard(21), Some(Hand::H21));
        assert_eq!(Hand::hard(1), None);
        assert_eq!(Hand::hard(22), None);
        assert_eq!(Hand::soft(12), Some(Hand::S12));
        assert_eq!(Hand::soft(21), Some(Hand::S21));
        assert_eq!(Hand::soft(11), None);
        assert_eq!(Hand::soft(22), None);
    }

    #[test]
    fn test_hard_and_soft_bases() {
        assert_eq!(Hand::H2.index(), 1);
        assert_eq!(Hand::hard(2).map(Hand::index), Some(Hand::H2.index()));
        assert_eq!(Hand::hard(21).map(Hand::index), Some(Hand::H21.index()));
        assert_eq!(Hand::soft(12).map(Hand::index), Some(Hand::S12.index()));
        assert_eq!(Hand::H2.total(), 2);
        assert_eq!(Hand::S12.total(), 12);
    }

    #[test]
    fn test_hand_totals() {
        for n in 2..=21 {
            assert_eq!(Hand::hard(n).map(Hand::total), Some(n));
        }
        for n in 12..=21 {
            assert_eq!(Hand::soft(n).map(Hand::total), Some(n));
        }
        assert_eq!(Hand::Deal.total(), 0);
        assert_eq!(Hand::T.total(), 10);
        assert_eq!(Hand::A.total(), 11);
        assert_eq!(Hand::BJ.total(), 21);
    }

    #[test]
    fn test_softness() {
        assert!(Hand::S17.is_soft());
        assert!(Hand::A.is_soft());
        assert!(Hand::BJ.is_soft());
        assert!(!Hand::H17.is_soft());
        assert!(!Hand::T.is_soft());
        assert!(Hand::H21.is_hard());
        assert!(!Hand::T.is_hard());
    }

    #[test]
    fn test_decision_states() {
        assert_eq!(Hand::DECISIONS.len(), 26);
        assert!(Hand::DECISIONS.iter().all(|h| h.total() < 21));
        assert!(!Hand::DECISIONS.contains(&Hand::BJ));
    }

    #[test]
    fn test_count_from_total() {
        assert_eq!(Count::from_total(4), Count::Sixteen);
        assert_eq!(Count::from_total(16), Count::Sixteen);
        assert_eq!(Count::from_total(17), Count::Seventeen);
        assert_eq!(Count::from_total(21), Count::TwentyOne);
        assert_eq!(Count::from_total(22), Count::Bust);
    }

    #[test]
    fn test_count_rank_order() {
        assert!(Count::Bust < Count::Sixteen);
        assert!(Count::TwentyOne < Count::Blackjack);
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(State::DEAL.to_string(), "DEAL");
        assert_eq!(State::BUST.to_string(), "BUST");
        assert_eq!(State::Live(Hand::S17).to_string(), "S17");
        assert_eq!(State::Done(Count::Sixteen).to_string(), "16");
        assert_eq!(format!("{:>4}", State::Live(Hand::BJ)), "  BJ");
    }
}
