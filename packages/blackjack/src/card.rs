use serde::{Deserialize, Serialize};
use std::fmt;

/// A card from the infinite shoe. Suits never matter and the four
/// ten-valued ranks (10, J, Q, K) are collapsed into [`Card::Ten`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Card {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Ace,
}

impl Card {
    pub const COUNT: usize = 10;

    pub const ALL: [Card; Card::COUNT] = [
        Card::Two,
        Card::Three,
        Card::Four,
        Card::Five,
        Card::Six,
        Card::Seven,
        Card::Eight,
        Card::Nine,
        Card::Ten,
        Card::Ace,
    ];

    /// Ordinal in `0..10`, used to index the rule tables.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Blackjack value with the ace counted as 1.
    /// Callers decide whether an ace is promoted to 11.
    pub fn value(self) -> u8 {
        match self {
            Card::Ace => 1,
            Card::Ten => 10,
            other => other as u8 + 2,
        }
    }

    pub fn is_ace(self) -> bool {
        self == Card::Ace
    }

    /// Number of the 13 ranks that map onto this card.
    pub fn weight(self) -> u8 {
        match self {
            Card::Ten => 4,
            _ => 1,
        }
    }

    /// Probability of drawing this card from the infinite shoe.
    pub fn probability(self) -> f64 {
        self.weight() as f64 / 13.0
    }

    pub fn label(self) -> &'static str {
        match self {
            Card::Two => "2",
            Card::Three => "3",
            Card::Four => "4",
            Card::Five => "5",
            Card::Six => "6",
            Card::Seven => "7",
            Card::Eight => "8",
            Card::Nine => "9",
            Card::Ten => "T",
            Card::Ace => "A",
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_values() {
        let values: Vec<u8> = Card::ALL.iter().map(|c| c.value()).collect();
        assert_eq!(values, vec![2, 3, 4, 5, 6, 7, 8, 9, 10, 1]);
    }

    #[test]
    fn test_card_index_roundtrip() {
        for (i, card) in Card::ALL.iter().enumerate() {
            assert_eq!(card.index(), i);
            assert_eq!(Card::from_index(i), Some(*card));
        }
        assert_eq!(Card::from_index(10), None);
    }

    #[test]
    fn test_card_weights_cover_thirteen_ranks() {
        let total: u8 = Card::ALL.iter().map(|c| c.weight()).sum();
        assert_eq!(total, 13);
        let p: f64 = Card::ALL.iter().map(|c| c.probability()).sum();
        assert!((p - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_card_labels() {
        assert_eq!(Card::Ten.to_string(), "T");
        assert_eq!(Card::Ace.to_string(), "A");
        assert_eq!(format!("{:>3}", Card::Seven), "  7");
    }
}
