//! Run command implementation

use crate::config::Config;
use crate::trader::AutoTrader;
use clap::Args;

#[derive(Args, Debug)]
pub struct RunArgs {}

impl RunArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let mut trader = AutoTrader::new(config)?;
        tracing::info!(wallets = trader.wallet_count(), "starting continuous mode");

        let cancel = super::shutdown_token();
        trader.run(&cancel).await;
        Ok(())
    }
}
