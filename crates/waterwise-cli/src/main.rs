use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "waterwise", version, about = "Waterwise water usage tracker")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record today's usage and earn rewards
    Analyze(commands::analyze::AnalyzeArgs),
    /// Show the expected usage for the next day
    Baseline(commands::baseline::BaselineArgs),
    /// Compute a reward without recording anything
    Reward(commands::reward::RewardArgs),
    /// Recorded usage history
    History(commands::history::HistoryArgs),
    /// Ledger statistics
    Stats,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("WATERWISE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Baseline(args) => commands::baseline::run(args),
        Commands::Reward(args) => commands::reward::run(args),
        Commands::History(args) => commands::history::run(args),
        Commands::Stats => commands::stats::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
