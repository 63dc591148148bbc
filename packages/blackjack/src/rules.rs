use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    Action, Card, Count, DealerPolicy, DealerRule, Error, HitTable, Payout, PayoutRule,
    PayoutSpec, StandTable, State,
};

/// Configurable blackjack game rules
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRules {
    /// Payout structure, by name or as a full 8x8 matrix
    pub payout: PayoutSpec,

    /// Whether the dealer stands or hits on soft 17
    pub dealer: DealerRule,
}

impl GameRules {
    /// Sutton & Barto's rules (the default)
    pub fn sutton_barto() -> Self {
        Self::with_payout(PayoutRule::SuttonBarto)
    }

    /// Gym Blackjack-v0 with `natural=False`
    pub fn blackjack_v0() -> Self {
        Self::with_payout(PayoutRule::BlackjackV0)
    }

    /// Gym Blackjack-v0 with `natural=True`
    pub fn blackjack_v0_natural() -> Self {
        Self::with_payout(PayoutRule::BlackjackV0Natural)
    }

    /// Thorp's casino payouts, dealer stands on soft 17
    pub fn thorp() -> Self {
        Self::with_payout(PayoutRule::Thorp)
    }

    /// Thorp's payouts with a dealer who hits soft 17
    pub fn casino() -> Self {
        Self {
            dealer: DealerRule::HitsOnSoft17,
            ..Self::thorp()
        }
    }

    pub fn with_payout(rule: PayoutRule) -> Self {
        Self {
            payout: rule.into(),
            dealer: DealerRule::StandsOn17,
        }
    }

    pub fn build(&self) -> Result<Rules, Error> {
        Rules::new(self)
    }
}

/// The immutable tables of one rule set, shared by every episode played
/// under it.
#[derive(Debug, Clone, PartialEq)]
pub struct Rules {
    hit: HitTable,
    stand: StandTable,
    dealer: DealerPolicy,
    payout: Payout,
}

impl Rules {
    pub fn new(config: &GameRules) -> Result<Self, Error> {
        let payout = Payout::from_spec(&config.payout)?;
        let rules = Self {
            hit: HitTable::new()?,
            stand: StandTable::new()?,
            dealer: DealerPolicy::new(config.dealer),
            payout,
        };
        info!(
            "rules ready: payout={}, dealer={:?}",
            rules
                .payout
                .rule()
                .map_or("custom", PayoutRule::name),
            config.dealer
        );
        Ok(rules)
    }

    pub fn hit(&self, state: State, card: Card) -> State {
        self.hit.hit(state, card)
    }

    pub fn stand(&self, state: State) -> Count {
        self.stand.stand(state)
    }

    pub fn dealer_action(&self, state: State) -> Action {
        self.dealer.act(state)
    }

    /// Reward for the player once both sides have stopped drawing.
    pub fn reward(&self, player: State, dealer: State) -> f64 {
        self.payout.get(self.stand(player), self.stand(dealer))
    }

    pub fn hit_table(&self) -> &HitTable {
        &self.hit
    }

    pub fn stand_table(&self) -> &StandTable {
        &self.stand
    }

    pub fn dealer_policy(&self) -> &DealerPolicy {
        &self.dealer
    }

    pub fn payout(&self) -> &Payout {
        &self.payout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Hand;

    #[test]
    fn test_game_rules_default_is_sutton_barto() {
        let rules = GameRules::default();
        assert_eq!(rules, GameRules::sutton_barto());
        assert_eq!(rules.dealer, DealerRule::StandsOn17);
        assert_eq!(rules.build().unwrap().payout().rule(), Some(PayoutRule::SuttonBarto));
    }

    #[test]
    fn test_casino_preset() {
        let rules = GameRules::casino();
        assert_eq!(rules.dealer, DealerRule::HitsOnSoft17);
        assert_eq!(rules.payout, PayoutSpec::from(PayoutRule::Thorp));
    }

    #[test]
    fn test_unknown_payout_fails_construction() {
        let rules = GameRules {
            payout: PayoutSpec::Named("atlantic-city".to_string()),
            ..GameRules::default()
        };
        assert_eq!(
            rules.build(),
            Err(Error::UnknownPayout("atlantic-city".to_string()))
        );
    }

    #[test]
    fn test_reward_resolves_both_sides() {
        let rules = GameRules::default().build().unwrap();
        let natural = State::Live(Hand::BJ);
        let twenty_one = State::Live(Hand::H21);
        assert_eq!(rules.reward(natural, twenty_one), 1.0);
        assert_eq!(rules.reward(twenty_one, natural), -1.0);
        assert_eq!(rules.reward(State::Live(Hand::S18), State::Live(Hand::H18)), 0.0);
        assert_eq!(rules.reward(State::BUST, State::BUST), -1.0);
    }

    #[test]
    fn test_player_natural_vs_dealer_21_across_variants() {
        let natural = State::Live(Hand::BJ);
        let multi_card_21 = State::Live(Hand::S21);
        let reward = |rules: GameRules| rules.build().unwrap().reward(natural, multi_card_21);
        assert_eq!(reward(GameRules::sutton_barto()), 1.0);
        assert_eq!(reward(GameRules::blackjack_v0()), 0.0);
        assert_eq!(reward(GameRules::thorp()), 1.5);
    }

    #[test]
    fn test_rule_sets_coexist() {
        let stands = GameRules::default().build().unwrap();
        let hits = GameRules::casino().build().unwrap();
        let soft_17 = State::Live(Hand::S17);
        assert_eq!(stands.dealer_action(soft_17), Action::Stand);
        assert_eq!(hits.dealer_action(soft_17), Action::Hit);
        assert_eq!(stands.hit_table(), hits.hit_table());
    }

    #[test]
    fn test_game_rules_json_roundtrip() {
        let json = r#"{"payout": "blackjack-v0", "dealer": "hits_on_soft_17"}"#;
        let rules: GameRules = serde_json::from_str(json).unwrap();
        assert_eq!(rules.dealer, DealerRule::HitsOnSoft17);
        assert_eq!(rules.build().unwrap().payout().rule(), Some(PayoutRule::BlackjackV0));

        let empty: GameRules = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, GameRules::default());
    }
}
