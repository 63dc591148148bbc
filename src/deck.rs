use blackjack::Card;
use log::trace;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::EnvError;

/// Anything the environment can draw cards from.
pub trait CardSource {
    /// Draw a single card.
    fn draw(&mut self) -> Card;

    /// Draw two player cards and one dealer card.
    fn deal(&mut self) -> (Card, Card, Card) {
        let first = self.draw();
        let second = self.draw();
        let upcard = self.draw();
        (first, second, upcard)
    }
}

impl<S: CardSource + ?Sized> CardSource for Box<S> {
    fn draw(&mut self) -> Card {
        (**self).draw()
    }
}

// Maps a uniform rank 0..13 onto a card: four ranks are worth ten.
const CARD_LOOKUP: [Card; 13] = [
    Card::Two,
    Card::Three,
    Card::Four,
    Card::Five,
    Card::Six,
    Card::Seven,
    Card::Eight,
    Card::Nine,
    Card::Ten,
    Card::Ten,
    Card::Ten,
    Card::Ten,
    Card::Ace,
];

/// An infinite deck of cards (i.e. drawing from a single suit with replacement).
#[derive(Debug, Clone)]
pub struct InfiniteDeck<R = ChaCha8Rng> {
    rng: R,
}

impl InfiniteDeck<ChaCha8Rng> {
    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::from_rng(ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> InfiniteDeck<R> {
    pub fn from_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> CardSource for InfiniteDeck<R> {
    fn draw(&mut self) -> Card {
        let card = CARD_LOOKUP[self.rng.gen_range(0..CARD_LOOKUP.len())];
        trace!("drew {card}");
        card
    }
}

/// Replays a fixed sequence of cards, starting over once it runs out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedDeck {
    cards: Vec<Card>,
    next: usize,
}

impl ScriptedDeck {
    pub fn new(cards: Vec<Card>) -> Result<Self, EnvError> {
        if cards.is_empty() {
            return Err(EnvError::EmptyScript);
        }
        Ok(Self { cards, next: 0 })
    }

    /// Number of draws made so far.
    pub fn drawn(&self) -> usize {
        self.next
    }
}

impl CardSource for ScriptedDeck {
    fn draw(&mut self) -> Card {
        let card = self.cards[self.next % self.cards.len()];
        self.next += 1;
        trace!("drew {card} (scripted #{})", self.next);
        card
    }
}
