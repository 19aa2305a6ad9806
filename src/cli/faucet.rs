//! Faucet command implementation

use crate::config::Config;
use crate::trader::AutoTrader;
use clap::Args;

#[derive(Args, Debug)]
pub struct FaucetArgs {}

impl FaucetArgs {
    pub async fn execute(&self, config: Config) -> anyhow::Result<()> {
        let trader = AutoTrader::new(config)?;
        tracing::info!(wallets = trader.wallet_count(), "claiming faucets");

        let cancel = super::shutdown_token();
        trader.claim_faucets_all(&cancel).await;
        Ok(())
    }
}
