//! Daily command implementation

use crate::config::Config;
use crate::trader::AutoTrader;
use clap::Args;

#[derive(Args, Debug)]
pub struct DailyArgs {}

impl DailyArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let mut trader = AutoTrader::new(config)?;
        tracing::info!(wallets = trader.wallet_count(), "claiming daily rewards");

        let cancel = super::shutdown_token();
        trader.claim_daily_all(&cancel).await;
        Ok(())
    }
}
