use std::collections::HashMap;

use log::debug;

use crate::{Action, Card, Count, Hand, PolicyTable, Rules, State, Strategy};

/// Dealer outcome probability distribution, indexed by [`Count`].
pub type DealerProbs = [f64; Count::COUNT];

/// Result of house edge calculation.
#[derive(Debug, Clone, Copy)]
pub struct EdgeResult {
    /// House edge as a fraction (e.g., 0.005 = 0.5%).
    /// Positive means house advantage.
    pub house_edge: f64,
    /// Expected return per unit bet for the player.
    pub expected_return: f64,
}

/// Exact expected values for the infinite shoe.
///
/// Walks the hit table with the shoe's card probabilities instead of
/// sampling. Gives the dealer's outcome distribution per upcard, optimal
/// state and action values for the player, the optimal policy, and exact
/// evaluation of any [`Strategy`].
pub struct EdgeCalculator {
    rules: Rules,
    dealer_cache: HashMap<State, DealerProbs>,
    player_cache: HashMap<(State, Card), f64>,
}

impl EdgeCalculator {
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            dealer_cache: HashMap::new(),
            player_cache: HashMap::new(),
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Expected return of a freshly dealt episode under optimal play.
    pub fn calculate(&mut self) -> EdgeResult {
        let expected_return = self.aggregate(|calc, player, upcard| calc.value(player, upcard));
        EdgeResult {
            house_edge: -expected_return,
            expected_return,
        }
    }

    /// Expected return of a freshly dealt episode when the player follows
    /// `strategy`.
    pub fn evaluate_episode(&mut self, strategy: &impl Strategy) -> EdgeResult {
        let mut cache = HashMap::new();
        let expected_return = self.aggregate(|calc, player, upcard| {
            calc.evaluate_state(strategy, player, upcard, &mut cache)
        });
        EdgeResult {
            house_edge: -expected_return,
            expected_return,
        }
    }

    // ── Dealer outcome probabilities ──

    /// Distribution of the dealer's final outcome from any dealer state.
    pub fn dealer_probs(&mut self, state: State) -> DealerProbs {
        if let Some(&cached) = self.dealer_cache.get(&state) {
            return cached;
        }
        let result = match self.rules.dealer_action(state) {
            Action::Stand => {
                let mut r = [0.0; Count::COUNT];
                r[self.rules.stand(state).index()] = 1.0;
                r
            }
            Action::Hit => {
                let mut r = [0.0; Count::COUNT];
                for card in Card::ALL {
                    let sub = self.dealer_probs(self.rules.hit(state, card));
                    for (acc, p) in r.iter_mut().zip(sub) {
                        *acc += card.probability() * p;
                    }
                }
                r
            }
        };
        self.dealer_cache.insert(state, result);
        result
    }

    /// Dealer probs starting from just the upcard. Nothing is conditioned on
    /// the hole card: the dealer never peeks.
    pub fn dealer_probs_from_upcard(&mut self, upcard: Card) -> DealerProbs {
        self.dealer_probs(self.rules.hit(State::DEAL, upcard))
    }

    // ── Player values ──

    /// Expected reward of standing now.
    pub fn stand_value(&mut self, player: State, upcard: Card) -> f64 {
        let player_count = self.rules.stand(player);
        if player_count == Count::Bust {
            // A bust player ends the episode before the dealer draws.
            let dealer = self.rules.stand(self.rules.hit(State::DEAL, upcard));
            return self.rules.payout().get(Count::Bust, dealer);
        }
        let dp = self.dealer_probs_from_upcard(upcard);
        Count::ALL
            .iter()
            .map(|&dealer| dp[dealer.index()] * self.rules.payout().get(player_count, dealer))
            .sum()
    }

    /// Expected reward of drawing one card and then playing optimally.
    pub fn hit_value(&mut self, player: State, upcard: Card) -> f64 {
        Card::ALL
            .iter()
            .map(|&card| card.probability() * self.value(self.rules.hit(player, card), upcard))
            .sum()
    }

    /// `[stand, hit]` action values.
    pub fn q_values(&mut self, player: Hand, upcard: Card) -> [f64; Action::COUNT] {
        let state = State::Live(player);
        [self.stand_value(state, upcard), self.hit_value(state, upcard)]
    }

    /// Optimal state value.
    pub fn value(&mut self, player: State, upcard: Card) -> f64 {
        if player.is_absorbing() {
            return self.stand_value(player, upcard);
        }
        let key = (player, upcard);
        if let Some(&cached) = self.player_cache.get(&key) {
            return cached;
        }
        let best = self
            .stand_value(player, upcard)
            .max(self.hit_value(player, upcard));
        self.player_cache.insert(key, best);
        best
    }

    /// Greedy policy over the optimal action values. Ties stand.
    pub fn optimal_policy(&mut self) -> PolicyTable {
        let mut table = PolicyTable::new();
        for hand in Hand::ALL {
            for upcard in Card::ALL {
                let [stand, hit] = self.q_values(hand, upcard);
                let action = if hit > stand { Action::Hit } else { Action::Stand };
                table.set(hand, upcard, action);
            }
        }
        debug!("derived optimal policy for {} states", Hand::COUNT * Card::COUNT);
        table
    }

    /// Value of a single state under `strategy`.
    pub fn evaluate(&mut self, strategy: &impl Strategy, player: Hand, upcard: Card) -> f64 {
        let mut cache = HashMap::new();
        self.evaluate_state(strategy, State::Live(player), upcard, &mut cache)
    }

    fn evaluate_state(
        &mut self,
        strategy: &impl Strategy,
        player: State,
        upcard: Card,
        cache: &mut HashMap<(State, Card), f64>,
    ) -> f64 {
        let hand = match player {
            State::Live(hand) => hand,
            done => return self.stand_value(done, upcard),
        };
        if let Some(&cached) = cache.get(&(player, upcard)) {
            return cached;
        }
        let v = match strategy.act(hand, upcard) {
            Action::Stand => self.stand_value(player, upcard),
            Action::Hit => {
                let mut v = 0.0;
                for card in Card::ALL {
                    let next = self.rules.hit(player, card);
                    v += card.probability() * self.evaluate_state(strategy, next, upcard, cache);
                }
                v
            }
        };
        cache.insert((player, upcard), v);
        v
    }

    // ── Aggregate ──

    /// Weight a per-state value by the probability of each opening deal.
    fn aggregate(&mut self, mut value: impl FnMut(&mut Self, State, Card) -> f64) -> f64 {
        let mut ev_sum = 0.0;
        for p1 in Card::ALL {
            let first = self.rules.hit(State::DEAL, p1);
            for p2 in Card::ALL {
                let player = self.rules.hit(first, p2);
                for upcard in Card::ALL {
                    let prob = p1.probability() * p2.probability() * upcard.probability();
                    ev_sum += prob * value(self, player, upcard);
                }
            }
        }
        ev_sum
    }
}
