//! Stats command implementation

use crate::config::Config;
use crate::trader::AutoTrader;
use clap::Args;

#[derive(Args, Debug)]
pub struct StatsArgs {}

impl StatsArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let trader = AutoTrader::new(config)?;
        tracing::info!(wallets = trader.wallet_count(), "fetching wallet statistics");

        let cancel = super::shutdown_token();
        trader.report_stats(&cancel).await;
        Ok(())
    }
}
