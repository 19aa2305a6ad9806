//! Per-wallet trading loop

use super::stats::WalletStats;
use crate::client::{PredictionClient, WagerDecision};
use crate::config::BettingConfig;
use crate::error::ClientError;
use crate::strategy::{self, MarketSnapshot};
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Drives one wallet: wager batches, daily claims, stat counters.
pub struct WalletTrader {
    client: PredictionClient,
    stats: WalletStats,
}

impl WalletTrader {
    pub fn new(client: PredictionClient) -> Self {
        Self {
            client,
            stats: WalletStats::default(),
        }
    }

    pub fn client(&self) -> &PredictionClient {
        &self.client
    }

    pub fn stats(&self) -> &WalletStats {
        &self.stats
    }

    fn short_address(&self) -> String {
        self.client.identity().short_address()
    }

    /// Place one batch of wagers, pausing a jittered interval between them.
    ///
    /// Returns early (without error) when `cancel` fires mid-batch. A failed
    /// attempt is counted and the batch continues.
    pub async fn run_batch(
        &mut self,
        betting: &BettingConfig,
        markets: &[u64],
        cancel: &CancellationToken,
    ) {
        // Inverted config ranges collapse to the minimum instead of panicking.
        let max_bets = betting.max_bets.max(betting.min_bets);
        let bets = {
            let mut rng = rand::thread_rng();
            rng.gen_range(betting.min_bets..=max_bets)
        };
        tracing::info!(wallet = %self.short_address(), bets, "starting wager batch");

        for i in 0..bets {
            if cancel.is_cancelled() {
                tracing::info!(wallet = %self.short_address(), "batch interrupted by shutdown");
                return;
            }

            let decision = self.decide(betting, markets).await;
            match self.client.place_wager(&decision).await {
                Ok(receipt) => {
                    self.stats.record_bet_success();
                    tracing::info!(
                        wallet = %self.short_address(),
                        market = decision.market_id,
                        outcome = %decision.outcome,
                        amount = %decision.amount,
                        signed = ?receipt.signature,
                        "wager placed"
                    );
                }
                Err(e) => {
                    self.stats.record_bet_failure();
                    tracing::warn!(
                        wallet = %self.short_address(),
                        market = decision.market_id,
                        error = %e,
                        "wager failed"
                    );
                }
            }

            // No pause after the last wager of the batch.
            if i + 1 < bets {
                let max_interval = betting.max_interval_secs.max(betting.min_interval_secs);
                let pause = {
                    let mut rng = rand::thread_rng();
                    Duration::from_secs(rng.gen_range(betting.min_interval_secs..=max_interval))
                };
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!(wallet = %self.short_address(), "batch interrupted by shutdown");
                        return;
                    }
                    _ = tokio::time::sleep(pause) => {}
                }
            }
        }
    }

    /// Pick a market, amount and outcome for one wager.
    async fn decide(&self, betting: &BettingConfig, markets: &[u64]) -> WagerDecision {
        let market_id = {
            let mut rng = rand::thread_rng();
            if betting.random_markets && !markets.is_empty() {
                markets[rng.gen_range(0..markets.len())]
            } else {
                betting.default_market_id
            }
        };

        // Snapshot fetch is advisory; on failure the strategy falls back to
        // its random path.
        let snapshot = match self.client.list_wagers(market_id).await {
            Ok(records) => Some(MarketSnapshot::from_records(&records)),
            Err(e) => {
                tracing::debug!(market = market_id, error = %e, "no snapshot for market");
                None
            }
        };

        let mut rng = rand::thread_rng();
        let outcome = strategy::choose_outcome(
            snapshot.as_ref(),
            betting.random_bypass_probability,
            &mut rng,
        );
        let amount = random_amount(betting, &mut rng);

        WagerDecision {
            market_id,
            outcome,
            amount,
        }
    }

    /// Claim the daily reward, folding cooldown and already-claimed outcomes
    /// into informational logs rather than failures.
    pub async fn claim_daily(&mut self) -> Result<(), ClientError> {
        if let Some(info) = self.client.get_daily_cooldown() {
            tracing::info!(wallet = %self.short_address(), detail = %info.detail, "daily reward on cooldown");
            return Ok(());
        }
        match self.client.claim_daily().await {
            Ok(_) => {
                self.stats.record_daily_claim();
                tracing::info!(wallet = %self.short_address(), "daily reward claimed");
                Ok(())
            }
            Err(e) if e.is_informational() => {
                tracing::info!(wallet = %self.short_address(), "{e}");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(wallet = %self.short_address(), error = %e, "daily claim failed");
                Err(e)
            }
        }
    }
}

/// Random wager amount within the configured bounds, rounded to cents.
fn random_amount<R: Rng>(betting: &BettingConfig, rng: &mut R) -> Decimal {
    use rust_decimal::prelude::ToPrimitive;

    let min = betting.min_amount.to_f64().unwrap_or(0.01);
    let max = betting.max_amount.to_f64().unwrap_or(1.0).max(min);
    let raw = rng.gen_range(min..=max);
    Decimal::from_f64(raw)
        .unwrap_or(betting.min_amount)
        .round_dp(2)
        .max(betting.min_amount)
}
