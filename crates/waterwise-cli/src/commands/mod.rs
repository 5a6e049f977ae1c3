pub mod analyze;
pub mod baseline;
pub mod config;
pub mod history;
pub mod reward;
pub mod stats;
