use clap::Args;
use waterwise_core::{calculate_reward, Config};

#[derive(Args)]
pub struct RewardArgs {
    /// Liters actually used
    #[arg(long, allow_negative_numbers = true)]
    pub actual: f64,
    /// Expected liters
    #[arg(long, allow_negative_numbers = true)]
    pub expected: f64,
}

pub fn run(args: RewardArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let reward = calculate_reward(args.actual, args.expected, &config.reward)?;
    println!("{reward}");
    Ok(())
}
