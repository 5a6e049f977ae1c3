use clap::Args;
use waterwise_core::Ledger;

#[derive(Args)]
pub struct HistoryArgs {
    /// Only show the most recent N records
    #[arg(long)]
    pub limit: Option<usize>,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: HistoryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let ledger = Ledger::open()?;
    let records = match args.limit {
        Some(limit) => ledger.recent(limit)?,
        None => ledger.records()?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No usage recorded yet.");
        return Ok(());
    }

    println!(
        "{:<12} {:>10} {:>10} {:>8} {:>8} {:>6}",
        "date", "usage", "expected", "reward", "eff%", "streak"
    );
    for r in &records {
        println!(
            "{:<12} {:>10.2} {:>10.2} {:>8.2} {:>8.2} {:>6}",
            r.date.to_string(),
            r.actual_usage,
            r.expected_usage,
            r.reward_score,
            r.efficiency_score,
            r.streak
        );
    }
    Ok(())
}
