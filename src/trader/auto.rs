//! Multi-wallet orchestrator

use super::stats::GlobalStats;
use super::wallet::WalletTrader;
use crate::client::PredictionClient;
use crate::config::Config;
use crate::faucet::FaucetManager;
use crate::wallet::Registry;
use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Pause between wallets within one cycle.
const INTER_WALLET_PAUSE: Duration = Duration::from_secs(5);
/// Pause between full cycles in continuous mode.
const INTER_CYCLE_PAUSE: Duration = Duration::from_secs(120);

/// Drives every configured wallet through wagering, claiming and reporting.
pub struct AutoTrader {
    config: Config,
    traders: Vec<WalletTrader>,
    markets: Vec<u64>,
}

impl AutoTrader {
    /// Load identities and build one client per wallet.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let identities = Registry::new(config.wallets.clone()).load()?;
        let mut traders = Vec::with_capacity(identities.len());
        for identity in identities {
            let client = PredictionClient::new(&config.api, identity)?;
            traders.push(WalletTrader::new(client));
        }
        Ok(Self {
            config,
            traders,
            markets: Vec::new(),
        })
    }

    pub fn wallet_count(&self) -> usize {
        self.traders.len()
    }

    /// One-time session setup: referral registration (best-effort) and market
    /// discovery through the first wallet's client.
    pub async fn prepare(&mut self, cancel: &CancellationToken) {
        if let Some(code) = self.config.api.referral_code.clone() {
            for trader in &self.traders {
                if cancel.is_cancelled() {
                    return;
                }
                let outcome = trader.client().register_referral(&code).await;
                tracing::info!(
                    wallet = %trader.client().identity().short_address(),
                    outcome = ?outcome,
                    "referral registration"
                );
            }
        }

        if self.config.betting.random_markets && !cancel.is_cancelled() {
            if let Some(first) = self.traders.first() {
                self.markets = first
                    .client()
                    .discover_markets(
                        1,
                        self.config.betting.probe_max_id,
                        self.config.betting.discovery_cap,
                        cancel,
                    )
                    .await;
            }
        }
        if self.markets.is_empty() {
            tracing::info!(
                market = self.config.betting.default_market_id,
                "no markets discovered, falling back to the default market"
            );
        }
    }

    /// One pass over every wallet: claim the daily reward, then run a wager
    /// batch. Wallets are processed sequentially with a pause between them.
    pub async fn run_cycle(&mut self, cancel: &CancellationToken) {
        let wallet_count = self.traders.len();
        for (i, trader) in self.traders.iter_mut().enumerate() {
            if cancel.is_cancelled() {
                return;
            }
            tracing::info!(
                wallet = %trader.client().identity().short_address(),
                position = i + 1,
                total = wallet_count,
                "processing wallet"
            );

            // Failures stay inside the wallet's own counters.
            let _ = trader.claim_daily().await;
            trader
                .run_batch(&self.config.betting, &self.markets, cancel)
                .await;

            if i + 1 < wallet_count {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(INTER_WALLET_PAUSE) => {}
                }
            }
        }
    }

    /// Continuous mode: cycles separated by a jittered pause until cancelled,
    /// with a summary after every cycle and a final one on shutdown.
    pub async fn run(&mut self, cancel: &CancellationToken) {
        self.prepare(cancel).await;
        let mut cycle = 0u64;
        loop {
            if cancel.is_cancelled() {
                break;
            }
            cycle += 1;
            tracing::info!(cycle, "starting cycle");
            self.run_cycle(cancel).await;
            self.log_summary();

            // Server-side stats drift as other actors move the markets;
            // refresh them every few cycles.
            if cycle % 5 == 0 {
                self.report_stats(cancel).await;
            }

            let pause = {
                let mut rng = rand::thread_rng();
                INTER_CYCLE_PAUSE + Duration::from_secs(rng.gen_range(0..30))
            };
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(pause) => {}
            }
        }
        tracing::info!("shutting down");
        self.log_summary();
    }

    /// Claim the daily reward on every wallet.
    pub async fn claim_daily_all(&mut self, cancel: &CancellationToken) {
        for trader in &mut self.traders {
            if cancel.is_cancelled() {
                return;
            }
            let _ = trader.claim_daily().await;
        }
    }

    /// Claim every faucet for every wallet.
    pub async fn claim_faucets_all(&self, cancel: &CancellationToken) {
        let manager = FaucetManager::new(self.config.faucet.clone(), &self.config.captcha);
        let mut claimed = 0usize;
        for trader in &self.traders {
            if cancel.is_cancelled() {
                break;
            }
            let report = manager.claim_all(trader.client().identity(), cancel).await;
            claimed += report.claimed_count();
        }
        tracing::info!(claimed, "faucet pass finished");
    }

    /// Fetch and log server-side stats for every wallet.
    pub async fn report_stats(&self, cancel: &CancellationToken) {
        for trader in &self.traders {
            if cancel.is_cancelled() {
                return;
            }
            let client = trader.client();
            let wallet = client.identity().short_address();

            match client.get_user_stats().await {
                Ok(stats) if stats.is_empty() => {
                    tracing::info!(wallet = %wallet, "no server-side stats available")
                }
                Ok(stats) => {
                    let summary = serde_json::Value::Object(stats);
                    tracing::info!(wallet = %wallet, stats = %summary, "server stats");
                }
                Err(e) => tracing::warn!(wallet = %wallet, error = %e, "stats fetch failed"),
            }

            match client.get_user_achievements().await {
                Ok(achievements) => tracing::info!(
                    wallet = %wallet,
                    achievements = achievements.len(),
                    "achievements"
                ),
                Err(e) => {
                    tracing::warn!(wallet = %wallet, error = %e, "achievements fetch failed")
                }
            }
        }
        self.log_summary();
    }

    pub fn global_stats(&self) -> GlobalStats {
        GlobalStats::aggregate(self.traders.iter().map(|t| t.stats()))
    }

    fn log_summary(&self) {
        let global = self.global_stats();
        tracing::info!(
            wallets = global.wallets,
            total_bets = global.total_bets,
            successful = global.successful_bets,
            failed = global.failed_bets,
            daily_claims = global.daily_claims,
            "session summary"
        );
        for trader in &self.traders {
            let stats = trader.stats();
            tracing::info!(
                wallet = %trader.client().identity().short_address(),
                total_bets = stats.total_bets,
                successful = stats.successful_bets,
                failed = stats.failed_bets,
                daily_claims = stats.daily_claims,
                "wallet summary"
            );
        }
    }
}
