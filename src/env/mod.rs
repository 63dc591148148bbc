use std::fmt;
use std::sync::Arc;

use blackjack::{Action, Card, Count, Hand, Rules, State};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{CardSource, EnvConfig, EnvError, InfiniteDeck};

/// Current phase of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    AwaitingDeal,
    PlayerTurn,
    DealerTurn,
    Resolved,
}

/// What the player sees of the dealer: the bare upcard while the player is
/// still drawing, the dealer's hand once it has been played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dealer {
    Upcard(Card),
    Hand(State),
}

impl Dealer {
    /// The dealer's hand, folding a bare upcard through the deal-pending state.
    pub fn state(self, rules: &Rules) -> State {
        match self {
            Dealer::Upcard(card) => rules.hit(State::DEAL, card),
            Dealer::Hand(state) => state,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Dealer::Upcard(card) => card.label(),
            Dealer::Hand(state) => state.label(),
        }
    }
}

impl From<Card> for Dealer {
    fn from(card: Card) -> Self {
        Dealer::Upcard(card)
    }
}

impl From<State> for Dealer {
    fn from(state: State) -> Self {
        Dealer::Hand(state)
    }
}

impl fmt::Display for Dealer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Observation {
    pub player: State,
    pub dealer: Dealer,
}

/// Cards received by each side during the current episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Info {
    pub player: Vec<Card>,
    pub dealer: Vec<Card>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: Info,
}

/// The discrete observation space: the player's decision states crossed
/// with the dealer's upcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Space {
    pub player: &'static [Hand],
    pub dealer: &'static [Card],
}

impl Space {
    pub fn len(&self) -> usize {
        self.player.len() * self.dealer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Blackjack environment corresponding to Examples 5.1, 5.3 and 5.4 in
/// Sutton & Barto's "Reinforcement Learning: An Introduction" (2nd ed.).
///
/// The player draws until standing or busting; the dealer then plays out a
/// fixed policy and the reward comes from the payout matrix. Splitting,
/// doubling, insurance and surrender are not supported.
pub struct BlackjackEnv<D = InfiniteDeck> {
    rules: Arc<Rules>,
    deck: D,
    player: State,
    dealer: Dealer,
    phase: Phase,
    reward: Option<f64>,
    info: Info,
}

impl BlackjackEnv<InfiniteDeck> {
    pub fn from_config(config: &EnvConfig) -> Result<Self, EnvError> {
        let rules = Arc::new(config.rules.build()?);
        Ok(Self::new(rules, config.deck()))
    }
}

impl<D: CardSource> BlackjackEnv<D> {
    pub fn new(rules: Arc<Rules>, deck: D) -> Self {
        Self {
            rules,
            deck,
            player: State::DEAL,
            dealer: Dealer::Hand(State::DEAL),
            phase: Phase::AwaitingDeal,
            reward: None,
            info: Info::default(),
        }
    }

    pub fn rules(&self) -> &Arc<Rules> {
        &self.rules
    }

    pub fn deck(&self) -> &D {
        &self.deck
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn observation(&self) -> Observation {
        Observation {
            player: self.player,
            dealer: self.dealer,
        }
    }

    pub fn info(&self) -> &Info {
        &self.info
    }

    /// Reward of the finished episode, if it is finished.
    pub fn reward(&self) -> Option<f64> {
        self.reward
    }

    pub fn reward_range(&self) -> (f64, f64) {
        self.rules.payout().range()
    }

    pub fn observation_space(&self) -> Space {
        Space {
            player: &Hand::DECISIONS,
            dealer: &Card::ALL,
        }
    }

    pub fn action_space(&self) -> &'static [Action] {
        &Action::ALL
    }

    /// Start a new episode: two player cards and one dealer upcard.
    pub fn reset(&mut self) -> Observation {
        let (first, second, upcard) = self.deck.deal();
        self.info = Info {
            player: vec![first, second],
            dealer: vec![upcard],
        };
        self.player = self.rules.hit(self.rules.hit(State::DEAL, first), second);
        self.dealer = Dealer::Upcard(upcard);
        self.phase = Phase::PlayerTurn;
        self.reward = None;
        debug!("dealt {} against {}", self.player, self.dealer);
        self.observation()
    }

    /// Start an episode from a chosen state instead of a random deal, as
    /// Monte Carlo exploring starts require.
    ///
    /// The dealer policy is consulted before each dealer draw, so a dealer
    /// hand that already stands (e.g. `H17`) draws no cards on `Stand`.
    pub fn explore(&mut self, player: Hand, dealer: impl Into<Dealer>) -> Observation {
        self.player = State::Live(player);
        self.dealer = dealer.into();
        self.info = Info::default();
        self.phase = Phase::PlayerTurn;
        self.reward = None;
        debug!("exploring {} against {}", self.player, self.dealer);
        self.observation()
    }

    pub fn step(&mut self, action: Action) -> Result<Step, EnvError> {
        if self.phase != Phase::PlayerTurn {
            return Err(EnvError::NotPlayerTurn(self.phase));
        }
        let done = match action {
            Action::Hit => {
                let card = self.deck.draw();
                self.info.player.push(card);
                let next = self.rules.hit(self.player, card);
                debug!("player hits {card}: {} -> {next}", self.player);
                self.player = next;
                if next.is_bust() {
                    // The dealer reveals but never draws against a bust.
                    self.dealer = Dealer::Hand(self.dealer.state(&self.rules));
                    true
                } else {
                    false
                }
            }
            Action::Stand => {
                self.play_dealer();
                true
            }
        };
        let reward = if done {
            let dealer = self.dealer.state(&self.rules);
            let reward = self.rules.reward(self.player, dealer);
            self.phase = Phase::Resolved;
            self.reward = Some(reward);
            debug!(
                "resolved {} vs {}: {reward:+}",
                self.rules.stand(self.player),
                self.rules.stand(dealer)
            );
            reward
        } else {
            0.0
        };
        Ok(Step {
            observation: self.observation(),
            reward,
            done,
            info: self.info.clone(),
        })
    }

    fn play_dealer(&mut self) {
        self.phase = Phase::DealerTurn;
        let mut dealer = self.dealer.state(&self.rules);
        while self.rules.dealer_action(dealer) == Action::Hit {
            let card = self.deck.draw();
            self.info.dealer.push(card);
            let next = self.rules.hit(dealer, card);
            debug!("dealer hits {card}: {dealer} -> {next}");
            dealer = next;
        }
        self.dealer = Dealer::Hand(dealer);
    }

    /// One-line summary of the table, with the reward once resolved.
    pub fn render(&self) -> String {
        let p = self.player.label();
        let d = self.dealer.label();
        match self.reward {
            Some(r) => format!("player: {p:>4}; dealer: {d:>4}; reward: {r:>+4?}"),
            None => format!("player: {p:>4}; dealer: {d:>4};"),
        }
    }

    /// Final outcome categories of both sides, once resolved.
    pub fn outcome(&self) -> Option<(Count, Count)> {
        self.reward.map(|_| {
            (
                self.rules.stand(self.player),
                self.rules.stand(self.dealer.state(&self.rules)),
            )
        })
    }
}
