//! Tabular Monte Carlo methods over the decision states of the environment.

use blackjack::{Action, Card, Hand, PolicyTable, State, Strategy, Threshold};
use gym_blackjack::{BlackjackEnv, CardSource, Dealer, EnvError, Observation};
use log::debug;
use rand::Rng;

/// Running mean of returns per (hand, upcard).
#[derive(Debug, Clone)]
pub struct ValueTable {
    sums: [[f64; Card::COUNT]; Hand::COUNT],
    visits: [[u32; Card::COUNT]; Hand::COUNT],
}

impl ValueTable {
    pub fn new() -> Self {
        Self {
            sums: [[0.0; Card::COUNT]; Hand::COUNT],
            visits: [[0; Card::COUNT]; Hand::COUNT],
        }
    }

    fn record(&mut self, hand: Hand, upcard: Card, ret: f64) {
        self.sums[hand.index()][upcard.index()] += ret;
        self.visits[hand.index()][upcard.index()] += 1;
    }

    pub fn visits(&self, hand: Hand, upcard: Card) -> u32 {
        self.visits[hand.index()][upcard.index()]
    }

    /// Average return, or `None` if never visited.
    pub fn value(&self, hand: Hand, upcard: Card) -> Option<f64> {
        match self.visits(hand, upcard) {
            0 => None,
            n => Some(self.sums[hand.index()][upcard.index()] / f64::from(n)),
        }
    }

    /// Grid of values over the decision states, blank where unvisited.
    pub fn render(&self) -> String {
        let mut out = String::from("     ");
        for card in Card::ALL {
            out.push_str(&format!("{card:>6}"));
        }
        out.push('\n');
        for hand in Hand::DECISIONS {
            out.push_str(&format!("{hand:>4} "));
            for card in Card::ALL {
                match self.value(hand, card) {
                    Some(v) => out.push_str(&format!("{v:>+6.2}")),
                    None => out.push_str("      "),
                }
            }
            out.push('\n');
        }
        out
    }
}

impl Default for ValueTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Action values learned by exploring-starts control, with the greedy policy.
#[derive(Debug, Clone)]
pub struct Control {
    q: [[[f64; Action::COUNT]; Card::COUNT]; Hand::COUNT],
    visits: [[[u32; Action::COUNT]; Card::COUNT]; Hand::COUNT],
    policy: PolicyTable,
}

impl Control {
    /// Starts from the stick-on-20 policy.
    pub fn new() -> Self {
        Self {
            q: [[[0.0; Action::COUNT]; Card::COUNT]; Hand::COUNT],
            visits: [[[0; Action::COUNT]; Card::COUNT]; Hand::COUNT],
            policy: PolicyTable::from_strategy(&Threshold::new(20)),
        }
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    pub fn q_values(&self, hand: Hand, upcard: Card) -> [f64; Action::COUNT] {
        self.q[hand.index()][upcard.index()]
    }

    pub fn visits(&self, hand: Hand, upcard: Card, action: Action) -> u32 {
        self.visits[hand.index()][upcard.index()][action.index()]
    }

    fn update(&mut self, hand: Hand, upcard: Card, action: Action, ret: f64) {
        let (h, c, a) = (hand.index(), upcard.index(), action.index());
        self.visits[h][c][a] += 1;
        self.q[h][c][a] += (ret - self.q[h][c][a]) / f64::from(self.visits[h][c][a]);

        let [stand, hit] = self.q[h][c];
        // Ties stand
        let greedy = if hit > stand { Action::Hit } else { Action::Stand };
        self.policy.set(hand, upcard, greedy);
    }
}

impl Default for Control {
    fn default() -> Self {
        Self::new()
    }
}

fn shown_upcard(obs: &Observation) -> Option<Card> {
    match obs.dealer {
        Dealer::Upcard(card) => Some(card),
        Dealer::Hand(_) => None,
    }
}

/// Play out an episode from `obs`, taking `first` (if any) before following
/// `strategy`. Returns the visited (hand, action) pairs and the reward.
fn rollout<D: CardSource>(
    env: &mut BlackjackEnv<D>,
    mut obs: Observation,
    upcard: Card,
    first: Option<Action>,
    strategy: &impl Strategy,
) -> Result<(Vec<(Hand, Action)>, f64), EnvError> {
    let mut visited = Vec::new();
    let mut forced = first;
    loop {
        let hand = match obs.player {
            State::Live(hand) => hand,
            State::Done(_) => return Ok((visited, env.reward().unwrap_or(0.0))),
        };
        let action = forced
            .take()
            .unwrap_or_else(|| strategy.act(hand, upcard));
        visited.push((hand, action));
        let step = env.step(action)?;
        if step.done {
            return Ok((visited, step.reward));
        }
        obs = step.observation;
    }
}

/// First-visit Monte Carlo prediction of `strategy`'s state values.
/// Rewards arrive only at the end, so every visit's return is the final reward.
pub fn predict<D: CardSource>(
    env: &mut BlackjackEnv<D>,
    strategy: &impl Strategy,
    episodes: usize,
) -> Result<ValueTable, EnvError> {
    let mut values = ValueTable::new();
    for episode in 0..episodes {
        let obs = env.reset();
        let Some(upcard) = shown_upcard(&obs) else {
            continue;
        };
        let (visited, reward) = rollout(env, obs, upcard, None, strategy)?;
        let mut seen: Vec<Hand> = Vec::with_capacity(visited.len());
        for (hand, _) in visited {
            if !seen.contains(&hand) {
                seen.push(hand);
                values.record(hand, upcard, reward);
            }
        }
        if episode % 100_000 == 0 {
            debug!("prediction episode {episode}");
        }
    }
    Ok(values)
}

/// Monte Carlo control with exploring starts: every episode begins at a
/// uniformly random decision state, upcard and first action, then follows
/// the current greedy policy.
pub fn exploring_starts<D: CardSource>(
    env: &mut BlackjackEnv<D>,
    rng: &mut impl Rng,
    episodes: usize,
) -> Result<Control, EnvError> {
    let mut control = Control::new();
    for episode in 0..episodes {
        let hand = Hand::DECISIONS[rng.gen_range(0..Hand::DECISIONS.len())];
        let upcard = Card::ALL[rng.gen_range(0..Card::COUNT)];
        let action = Action::ALL[rng.gen_range(0..Action::COUNT)];

        let obs = env.explore(hand, upcard);
        let policy = control.policy.clone();
        let (visited, reward) = rollout(env, obs, upcard, Some(action), &policy)?;

        let mut seen: Vec<(Hand, Action)> = Vec::with_capacity(visited.len());
        for pair in visited {
            if !seen.contains(&pair) {
                seen.push(pair);
                control.update(pair.0, upcard, pair.1, reward);
            }
        }
        if episode % 100_000 == 0 {
            debug!("control episode {episode}");
        }
    }
    Ok(control)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use blackjack::{EdgeCalculator, GameRules};
    use gym_blackjack::{InfiniteDeck, ScriptedDeck};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn seeded_env(seed: u64) -> BlackjackEnv {
        let rules = Arc::new(GameRules::default().build().unwrap());
        BlackjackEnv::new(rules, InfiniteDeck::seeded(seed))
    }

    #[test]
    fn test_predict_scripted_episode() {
        use Card::*;
        // Player T+2 = H12 vs 6, hits 5 to H17, then T for H27 bust.
        let rules = Arc::new(GameRules::default().build().unwrap());
        let deck = ScriptedDeck::new(vec![Ten, Two, Six, Five, Ten]).unwrap();
        let mut env = BlackjackEnv::new(rules, deck);
        let values = predict(&mut env, &Threshold::new(20), 1).unwrap();
        assert_eq!(values.value(Hand::H12, Six), Some(-1.0));
        assert_eq!(values.value(Hand::H17, Six), Some(-1.0));
        assert_eq!(values.value(Hand::H20, Six), None);
        assert_eq!(values.visits(Hand::H12, Six), 1);
    }

    #[test]
    fn test_predict_approaches_exact_values() {
        let mut env = seeded_env(11);
        let strategy = Threshold::new(20);
        let values = predict(&mut env, &strategy, 50_000).unwrap();

        let mut calc = EdgeCalculator::new(GameRules::default().build().unwrap());
        let exact = calc.evaluate(&strategy, Hand::H20, Card::Ten);
        let estimate = values.value(Hand::H20, Card::Ten).unwrap();
        assert!((estimate - exact).abs() < 0.1, "{estimate} vs {exact}");
    }

    #[test]
    fn test_exploring_starts_learns_obvious_cells() {
        let mut env = seeded_env(4);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let control = exploring_starts(&mut env, &mut rng, 100_000).unwrap();
        let policy = control.policy();
        for card in Card::ALL {
            assert_eq!(policy.act(Hand::H20, card), Action::Stand, "H20 vs {card}");
            assert_eq!(policy.act(Hand::H11, card), Action::Hit, "H11 vs {card}");
            assert!(control.visits(Hand::H20, card, Action::Hit) > 0);
        }
    }

    #[test]
    fn test_greedy_update_prefers_stand_on_ties() {
        let mut control = Control::new();
        control.update(Hand::H8, Card::Six, Action::Hit, 0.0);
        control.update(Hand::H8, Card::Six, Action::Stand, 0.0);
        assert_eq!(control.policy().act(Hand::H8, Card::Six), Action::Stand);
        control.update(Hand::H8, Card::Six, Action::Hit, 1.0);
        assert_eq!(control.q_values(Hand::H8, Card::Six), [0.0, 0.5]);
        assert_eq!(control.policy().act(Hand::H8, Card::Six), Action::Hit);
    }
}
