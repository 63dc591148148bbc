use log::info;

use crate::{Card, Count, Error, Hand, State};

/// Hit transitions for every live hand and card.
///
/// Built once by enumerating the whole `(Hand, Card)` domain; construction
/// fails rather than leaving a gap to be discovered by a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitTable {
    cells: [[State; Card::COUNT]; Hand::COUNT],
}

impl HitTable {
    pub fn new() -> Result<Self, Error> {
        let mut cells = [[State::DEAL; Card::COUNT]; Hand::COUNT];
        for hand in Hand::ALL {
            for card in Card::ALL {
                cells[hand.index()][card.index()] =
                    Self::draw(hand, card).ok_or_else(|| Error::IncompleteTable {
                        table: "hit",
                        cell: format!("{hand} + {card}"),
                    })?;
            }
        }
        info!("built hit table: {} hands x {} cards", Hand::COUNT, Card::COUNT);
        Ok(Self { cells })
    }

    /// The state after drawing `card`. Finished states are absorbing.
    pub fn hit(&self, state: State, card: Card) -> State {
        match state {
            State::Live(hand) => self.cells[hand.index()][card.index()],
            done => done,
        }
    }

    /// Fold a sequence of cards starting from the deal-pending state.
    pub fn fold(&self, cards: &[Card]) -> State {
        cards
            .iter()
            .fold(State::DEAL, |state, &card| self.hit(state, card))
    }

    // ── Rules ──

    fn draw(hand: Hand, card: Card) -> Option<State> {
        let value = card.value();
        let next = match hand {
            Hand::Deal => match card {
                Card::Ten => Hand::T,
                Card::Ace => Hand::A,
                _ => Hand::hard(value)?,
            },
            Hand::T => match card {
                Card::Ace => Hand::BJ,
                _ => Hand::hard(10 + value)?,
            },
            Hand::A => match card {
                Card::Ten => Hand::BJ,
                Card::Ace => Hand::S12,
                _ => Hand::soft(11 + value)?,
            },
            Hand::BJ => return Self::draw(Hand::S21, card),
            soft if soft.is_soft() => {
                // Demoting the ace takes 10 off, which always lands on hard 12..=21.
                let raw = soft.total() + value;
                if raw <= 21 {
                    Hand::soft(raw)?
                } else {
                    Hand::hard(raw - 10)?
                }
            }
            hard => {
                let total = hard.total();
                if card.is_ace() && total + 11 <= 21 {
                    Hand::soft(total + 11)?
                } else if total + value <= 21 {
                    Hand::hard(total + value)?
                } else {
                    return Some(State::BUST);
                }
            }
        };
        Some(State::Live(next))
    }
}

/// Finalized outcome of every live hand once its owner stops drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandTable {
    cells: [Count; Hand::COUNT],
}

impl StandTable {
    pub fn new() -> Result<Self, Error> {
        let mut cells = [Count::Bust; Hand::COUNT];
        for hand in Hand::ALL {
            cells[hand.index()] = Self::resolve(hand).ok_or_else(|| Error::IncompleteTable {
                table: "stand",
                cell: hand.to_string(),
            })?;
        }
        info!("built stand table: {} hands", Hand::COUNT);
        Ok(Self { cells })
    }

    pub fn stand(&self, state: State) -> Count {
        match state {
            State::Live(hand) => self.cells[hand.index()],
            State::Done(count) => count,
        }
    }

    fn resolve(hand: Hand) -> Option<Count> {
        match hand {
            Hand::BJ => Some(Count::Blackjack),
            live if live.total() <= 21 => Some(Count::from_total(live.total())),
            _ => None,
        }
    }
}
