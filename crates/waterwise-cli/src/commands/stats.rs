use waterwise_core::Ledger;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let ledger = Ledger::open()?;
    let summary = ledger.summary()?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
