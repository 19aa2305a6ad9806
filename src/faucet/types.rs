//! Faucet claim outcomes

/// Outcome of one faucet claim attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaucetResult {
    /// The faucet confirmed the claim; detail carries amount/hash when known.
    Claimed(String),
    /// The attempt ran and the faucet refused or errored.
    Failed(String),
    /// The attempt never ran (no solver key, no signer, etc).
    Skipped(String),
}

impl FaucetResult {
    pub fn is_claimed(&self) -> bool {
        matches!(self, FaucetResult::Claimed(_))
    }
}

/// Per-faucet results of one claim-all pass for one wallet.
#[derive(Debug, Clone)]
pub struct FaucetReport {
    pub circle: FaucetResult,
    pub ink: FaucetResult,
}

impl FaucetReport {
    pub fn claimed_count(&self) -> usize {
        [&self.circle, &self.ink]
            .iter()
            .filter(|r| r.is_claimed())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claimed_count() {
        let report = FaucetReport {
            circle: FaucetResult::Claimed("10 USDC".to_string()),
            ink: FaucetResult::Failed("HTTP 429".to_string()),
        };
        assert_eq!(report.claimed_count(), 1);
        assert!(report.circle.is_claimed());
        assert!(!report.ink.is_claimed());
    }
}
