mod mc;

use std::path::PathBuf;
use std::sync::Arc;

use blackjack::{
    Action, BasicStrategy, Card, DealerMimic, DealerRule, EdgeCalculator, Hand,
    PayoutRule, PayoutSpec, Rules, State, Strategy, Threshold,
};
use clap::{Parser, Subcommand};
use gym_blackjack::{BlackjackEnv, Dealer, EnvConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

type BoxErr = Box<dyn std::error::Error + Send + Sync>;

#[derive(Parser)]
#[command(
    name = "blackjack-trainer",
    about = "Play, evaluate and learn blackjack policies by Monte Carlo"
)]
struct Cli {
    /// JSON environment config; flags below override it
    #[arg(long, env = "BLACKJACK_CONFIG")]
    config: Option<PathBuf>,

    /// Payout structure: sutton-barto, blackjack-v0, blackjack-v0-natural, thorp
    #[arg(long, env = "BLACKJACK_PAYOUT")]
    payout: Option<String>,

    /// Dealer hits soft 17
    #[arg(long, env = "DEALER_HITS_SOFT_17", action = clap::ArgAction::Set)]
    dealer_hits_soft_17: Option<bool>,

    /// Seed for the card source
    #[arg(long, env = "BLACKJACK_SEED")]
    seed: Option<u64>,

    /// Number of episodes
    #[arg(long, default_value = "500000")]
    episodes: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play episodes with a fixed strategy and report the mean reward
    Play {
        /// "basic", "dealer", or a stand threshold such as "20"
        #[arg(long, default_value = "basic")]
        strategy: String,

        /// Print this many episodes as they finish
        #[arg(long, default_value_t = 0)]
        show: usize,
    },
    /// First-visit Monte Carlo prediction of a strategy's state values
    Evaluate {
        /// "basic", "dealer", or a stand threshold such as "20"
        #[arg(long, default_value = "20")]
        strategy: String,
    },
    /// Monte Carlo control with exploring starts
    Train,
}

enum Choice {
    Basic(BasicStrategy),
    Dealer(DealerMimic),
    Threshold(Threshold),
}

impl Choice {
    fn parse(name: &str, dealer: DealerRule) -> Result<Self, BoxErr> {
        match name {
            "basic" => Ok(Choice::Basic(BasicStrategy)),
            "dealer" => Ok(Choice::Dealer(DealerMimic::new(dealer))),
            threshold => match threshold.parse::<u8>() {
                Ok(stand_at) => Ok(Choice::Threshold(Threshold::new(stand_at))),
                Err(_) => Err(format!(
                    "Invalid strategy '{threshold}'. Options: basic, dealer, or a total such as 20"
                )
                .into()),
            },
        }
    }
}

impl Strategy for Choice {
    fn act(&self, player: Hand, upcard: Card) -> Action {
        match self {
            Choice::Basic(s) => s.act(player, upcard),
            Choice::Dealer(s) => s.act(player, upcard),
            Choice::Threshold(s) => s.act(player, upcard),
        }
    }
}

fn load_config(cli: &Cli) -> Result<EnvConfig, BoxErr> {
    let mut config = match &cli.config {
        Some(path) => EnvConfig::from_file(path)?,
        None => EnvConfig::default(),
    };
    if let Some(payout) = &cli.payout {
        let rule: PayoutRule = payout.parse().map_err(|e| {
            format!(
                "{e}. Available: {}",
                PayoutRule::ALL.map(PayoutRule::name).join(", ")
            )
        })?;
        config.rules.payout = PayoutSpec::from(rule);
    }
    if let Some(hits) = cli.dealer_hits_soft_17 {
        config.rules.dealer = DealerRule::from_hits_soft_17(hits);
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), BoxErr> {
    let config = load_config(&cli)?;
    let rules = Arc::new(config.rules.build()?);
    let mut env = BlackjackEnv::new(rules.clone(), config.deck());
    log::info!(
        "payout={}, dealer={:?}, seed={:?}, episodes={}",
        rules.payout().rule().map_or("custom", PayoutRule::name),
        config.rules.dealer,
        config.seed,
        cli.episodes
    );

    match cli.command {
        Command::Play { strategy, show } => {
            let choice = Choice::parse(&strategy, config.rules.dealer)?;
            play(&mut env, &choice, cli.episodes, show)?;
            report_exact(&rules, &choice, &strategy);
        }
        Command::Evaluate { strategy } => {
            let choice = Choice::parse(&strategy, config.rules.dealer)?;
            let values = mc::predict(&mut env, &choice, cli.episodes)?;
            println!("State values of '{strategy}' after {} episodes:", cli.episodes);
            print!("{}", values.render());

            let mut calc = EdgeCalculator::new(Rules::clone(&rules));
            let worst = Hand::DECISIONS
                .iter()
                .flat_map(|&hand| Card::ALL.into_iter().map(move |card| (hand, card)))
                .filter_map(|(hand, card)| {
                    values
                        .value(hand, card)
                        .map(|v| (v - calc.evaluate(&choice, hand, card)).abs())
                })
                .fold(0.0_f64, f64::max);
            println!("Largest deviation from exact values: {worst:.4}");
        }
        Command::Train => {
            let seed = config.seed.unwrap_or(0);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let control = mc::exploring_starts(&mut env, &mut rng, cli.episodes)?;
            println!("Greedy policy after {} episodes:", cli.episodes);
            print!("{}", control.policy().render());

            let mut calc = EdgeCalculator::new(Rules::clone(&rules));
            let optimal = calc.optimal_policy();
            println!(
                "Cells differing from the optimal policy: {}",
                control.policy().disagreements(&optimal)
            );
            let learned = calc.evaluate_episode(control.policy());
            let best = calc.calculate();
            println!(
                "Learned return: {:+.4}% (optimal {:+.4}%)",
                learned.expected_return * 100.0,
                best.expected_return * 100.0
            );
        }
    }
    Ok(())
}

fn play<D: gym_blackjack::CardSource>(
    env: &mut BlackjackEnv<D>,
    strategy: &impl Strategy,
    episodes: usize,
    show: usize,
) -> Result<(), BoxErr> {
    let mut total = 0.0;
    let mut total_sq = 0.0;
    for episode in 0..episodes {
        let mut obs = env.reset();
        let upcard = match obs.dealer {
            Dealer::Upcard(card) => card,
            Dealer::Hand(_) => return Err("reset did not deal an upcard".into()),
        };
        let reward = loop {
            let action = match obs.player {
                State::Live(hand) => strategy.act(hand, upcard),
                State::Done(_) => Action::Stand,
            };
            let step = env.step(action)?;
            if step.done {
                break step.reward;
            }
            obs = step.observation;
        };
        if episode < show {
            println!("{}", env.render());
        }
        total += reward;
        total_sq += reward * reward;
    }
    let n = episodes.max(1) as f64;
    let mean = total / n;
    let stderr = ((total_sq / n - mean * mean).max(0.0) / n).sqrt();
    println!("Mean reward over {episodes} episodes: {mean:+.4} (± {stderr:.4})");
    Ok(())
}

fn report_exact(rules: &Rules, strategy: &impl Strategy, name: &str) {
    let mut calc = EdgeCalculator::new(rules.clone());
    let exact = calc.evaluate_episode(strategy);
    println!("Exact return of '{name}': {:+.4}", exact.expected_return);
}
