//! Bet command implementation

use crate::config::Config;
use crate::trader::AutoTrader;
use clap::Args;

#[derive(Args, Debug)]
pub struct BetArgs {
    /// Bet only on this market, skipping discovery
    #[arg(short, long)]
    pub market: Option<u64>,
}

impl BetArgs {
    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        if let Some(market_id) = self.market {
            config.betting.random_markets = false;
            config.betting.default_market_id = market_id;
        }

        let mut trader = AutoTrader::new(config)?;
        tracing::info!(wallets = trader.wallet_count(), "starting single betting pass");

        let cancel = super::shutdown_token();
        trader.prepare(&cancel).await;
        trader.run_cycle(&cancel).await;
        Ok(())
    }
}
