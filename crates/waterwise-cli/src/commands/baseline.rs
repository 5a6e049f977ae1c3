use clap::Args;
use serde::Serialize;
use waterwise_core::{Config, Ledger};

#[derive(Args)]
pub struct BaselineArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct BaselineReport<'a> {
    strategy: &'a str,
    samples: usize,
    expected_usage: f64,
}

pub fn run(args: BaselineArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let analyzer = config.analyzer()?;
    let ledger = Ledger::open()?;

    let history = ledger.records()?;
    let report = BaselineReport {
        strategy: analyzer.estimator_name(),
        samples: history.len(),
        expected_usage: analyzer.expected_for(&history)?,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Expected usage: {:.2} L ({} from {} record(s))",
            report.expected_usage, report.strategy, report.samples
        );
    }
    Ok(())
}
