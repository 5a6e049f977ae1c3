use chrono::{Local, NaiveDate};
use clap::Args;
use waterwise_core::{Config, Ledger, UsageInput};

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Liters used today
    #[arg(long, allow_negative_numbers = true)]
    pub usage: f64,
    /// Household members
    #[arg(long, default_value_t = 1)]
    pub members: u32,
    /// Observation date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let analyzer = config.analyzer()?;
    let ledger = Ledger::open()?;

    let date = args.date.unwrap_or_else(|| Local::now().date_naive());
    let analysis = analyzer.record(&ledger, UsageInput::new(date, args.usage, args.members))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    let record = &analysis.record;
    println!("Date:            {}", record.date);
    println!(
        "Usage:           {:.2} L ({:.2} L per person)",
        record.actual_usage, analysis.per_person_usage
    );
    println!(
        "Expected usage:  {:.2} L ({})",
        record.expected_usage,
        analyzer.estimator_name()
    );
    println!("Reward points:   {}", record.reward_score);
    println!("Efficiency:      {:.2}%", record.efficiency_score);
    println!("Streak:          {}", record.streak);
    println!();
    println!("{}", analysis.feedback.headline(record.reward_score));
    println!("{}", analysis.feedback.encouragement());
    Ok(())
}
