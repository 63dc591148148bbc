use blackjack::{
    BasicStrategy, DealerRule, EdgeCalculator, GameRules, PayoutRule, PayoutSpec, Threshold,
};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "edge-calc",
    about = "Exact blackjack expected return for the infinite shoe"
)]
struct Args {
    /// Payout structure: sutton-barto, blackjack-v0, blackjack-v0-natural, thorp
    #[arg(long, env = "BLACKJACK_PAYOUT", default_value = "sutton-barto")]
    payout: String,

    /// Dealer hits soft 17
    #[arg(long, env = "DEALER_HITS_SOFT_17", default_value_t = false, action = clap::ArgAction::Set)]
    dealer_hits_soft_17: bool,

    /// Print the optimal hit/stand table
    #[arg(long, default_value_t = false)]
    policy: bool,

    /// Also evaluate a fixed strategy: "basic" or a stand threshold such as "20"
    #[arg(long)]
    compare: Option<String>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let payout: PayoutRule = args.payout.parse().unwrap_or_else(|e| {
        eprintln!(
            "{e}. Available: {}",
            PayoutRule::ALL.map(PayoutRule::name).join(", ")
        );
        std::process::exit(1);
    });
    let config = GameRules {
        payout: PayoutSpec::from(payout),
        dealer: DealerRule::from_hits_soft_17(args.dealer_hits_soft_17),
    };
    let rules = config.build().unwrap_or_else(|e| {
        eprintln!("Invalid rules: {e}");
        std::process::exit(1);
    });

    eprintln!("Configuration:");
    eprintln!("  Payout:         {payout}");
    eprintln!(
        "  Dealer soft 17: {}",
        if args.dealer_hits_soft_17 {
            "hits"
        } else {
            "stands"
        }
    );
    let (lo, hi) = rules.payout().range();
    eprintln!("  Reward range:   [{lo:+}, {hi:+}]");
    eprintln!("Calculating...");

    let mut calc = EdgeCalculator::new(rules);
    let result = calc.calculate();

    println!("House edge:     {:+.4}%", result.house_edge * 100.0);
    println!("Player return:  {:+.4}%", result.expected_return * 100.0);

    if let Some(compare) = &args.compare {
        let fixed = match compare.as_str() {
            "basic" => calc.evaluate_episode(&BasicStrategy),
            threshold => match threshold.parse::<u8>() {
                Ok(stand_at) => calc.evaluate_episode(&Threshold::new(stand_at)),
                Err(_) => {
                    eprintln!("Invalid strategy '{threshold}'. Options: basic, or a total such as 20");
                    std::process::exit(1);
                }
            },
        };
        println!(
            "Strategy '{compare}': {:+.4}% ({:+.4}% vs optimal)",
            fixed.expected_return * 100.0,
            (fixed.expected_return - result.expected_return) * 100.0
        );
    }

    if args.policy {
        println!();
        print!("{}", calc.optimal_policy().render());
    }
}
