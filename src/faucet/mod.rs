//! Testnet faucet claiming
//!
//! Two faucets fund wallets for wagering: Circle's USDC faucet (GraphQL,
//! reCAPTCHA-guarded) and the Ink mystery faucet (plain JSON). Both are
//! claimed best-effort per wallet; one faucet failing never blocks the other.

mod circle;
mod ink;
mod types;

pub use circle::CircleFaucet;
pub use ink::InkFaucet;
pub use types::{FaucetReport, FaucetResult};

use crate::captcha::CaptchaSolver;
use crate::config::{CaptchaConfig, FaucetConfig};
use crate::wallet::Identity;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Pause between the two faucets within one wallet's pass.
const INTER_FAUCET_PAUSE: Duration = Duration::from_secs(3);

/// Claims every configured faucet for a wallet.
pub struct FaucetManager {
    faucet_config: FaucetConfig,
    solver: Option<CaptchaSolver>,
}

impl FaucetManager {
    /// Build a manager. Without a solver key the Circle faucet (which needs
    /// a solved challenge) is skipped rather than attempted.
    pub fn new(faucet_config: FaucetConfig, captcha_config: &CaptchaConfig) -> Self {
        let solver = CaptchaSolver::new(captcha_config).ok();
        if solver.is_none() {
            tracing::warn!("no captcha solver configured; circle faucet will be skipped");
        }
        Self {
            faucet_config,
            solver,
        }
    }

    /// Run both faucets for one identity, collecting per-faucet results.
    /// Cancellation skips whatever has not started yet.
    pub async fn claim_all(&self, identity: &Identity, cancel: &CancellationToken) -> FaucetReport {
        let circle = match &self.solver {
            Some(solver) if !cancel.is_cancelled() => {
                tracing::info!(wallet = %identity.short_address(), "claiming circle faucet");
                CircleFaucet::new(&self.faucet_config, solver)
                    .claim(identity, cancel)
                    .await
            }
            Some(_) => FaucetResult::Skipped("shutdown requested".to_string()),
            None => FaucetResult::Skipped("no captcha solver configured".to_string()),
        };
        log_result(identity, "circle", &circle);

        tokio::select! {
            _ = cancel.cancelled() => {}
            _ = tokio::time::sleep(INTER_FAUCET_PAUSE) => {}
        }

        tracing::info!(wallet = %identity.short_address(), "claiming ink faucet");
        let ink = InkFaucet::new(&self.faucet_config)
            .claim(identity, cancel)
            .await;
        log_result(identity, "ink", &ink);

        FaucetReport { circle, ink }
    }
}

fn log_result(identity: &Identity, faucet: &str, result: &FaucetResult) {
    match result {
        FaucetResult::Claimed(detail) => {
            tracing::info!(wallet = %identity.short_address(), faucet, detail, "faucet claimed")
        }
        FaucetResult::Failed(detail) => {
            tracing::warn!(wallet = %identity.short_address(), faucet, detail, "faucet claim failed")
        }
        FaucetResult::Skipped(reason) => {
            tracing::info!(wallet = %identity.short_address(), faucet, reason, "faucet skipped")
        }
    }
}
