use clap::Parser;
use inkpredict_bot::cli::{Cli, Commands};
use inkpredict_bot::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        toml::from_str(include_str!("../config.toml.example")).expect("Invalid default config")
    });

    // Initialize telemetry
    inkpredict_bot::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            args.execute(config).await?;
        }
        Commands::Bet(args) => {
            args.execute(config).await?;
        }
        Commands::Daily(args) => {
            args.execute(config).await?;
        }
        Commands::Stats(args) => {
            args.execute(config).await?;
        }
        Commands::Faucet(args) => {
            args.execute(config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  API: {}", config.api.base_url);
            println!("  Site: {}", config.api.site_url);
            println!(
                "  Referral: {}",
                config.api.referral_code.as_deref().unwrap_or("(none)")
            );
            println!(
                "  Betting: {}-{} bets of {}-{} per wallet",
                config.betting.min_bets,
                config.betting.max_bets,
                config.betting.min_amount,
                config.betting.max_amount
            );
            println!(
                "  Captcha solver: {}",
                if config.captcha.api_key.is_some() {
                    "configured"
                } else {
                    "not configured"
                }
            );
        }
    }

    Ok(())
}
