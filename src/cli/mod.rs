//! CLI interface for inkpredict-bot
//!
//! Provides subcommands for:
//! - `run`: Continuous betting across all wallets
//! - `bet`: One wager batch per wallet, then exit
//! - `daily`: Claim the daily reward on every wallet
//! - `stats`: Report per-wallet and session statistics
//! - `faucet`: Claim testnet faucets for every wallet
//! - `config`: Show the effective configuration

mod bet;
mod daily;
mod faucet;
mod run;
mod stats;

pub use bet::BetArgs;
pub use daily::DailyArgs;
pub use faucet::FaucetArgs;
pub use run::RunArgs;
pub use stats::StatsArgs;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[command(name = "inkpredict-bot")]
#[command(about = "Multi-wallet automation for the InkPredict prediction market")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Continuous betting across all wallets
    Run(RunArgs),
    /// One wager batch per wallet, then exit
    Bet(BetArgs),
    /// Claim the daily reward on every wallet
    Daily(DailyArgs),
    /// Report per-wallet and session statistics
    Stats(StatsArgs),
    /// Claim testnet faucets for every wallet
    Faucet(FaucetArgs),
    /// Show the effective configuration
    Config,
}

/// Token cancelled on Ctrl+C. Every command waits on this so an interrupt
/// lands between requests instead of mid-request.
pub fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let child = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            child.cancel();
        }
    });
    token
}
