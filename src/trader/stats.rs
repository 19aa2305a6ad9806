//! Session counters
//!
//! Counters only move forward; a wager attempt ends in exactly one of the
//! success or failure buckets.

/// Per-wallet counters for the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletStats {
    pub total_bets: u64,
    pub successful_bets: u64,
    pub failed_bets: u64,
    pub daily_claims: u64,
}

impl WalletStats {
    pub fn record_bet_success(&mut self) {
        self.total_bets += 1;
        self.successful_bets += 1;
    }

    pub fn record_bet_failure(&mut self) {
        self.total_bets += 1;
        self.failed_bets += 1;
    }

    pub fn record_daily_claim(&mut self) {
        self.daily_claims += 1;
    }
}

/// Totals across all wallets, derived on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalStats {
    pub total_bets: u64,
    pub successful_bets: u64,
    pub failed_bets: u64,
    pub daily_claims: u64,
    pub wallets: usize,
}

impl GlobalStats {
    pub fn aggregate<'a>(wallets: impl IntoIterator<Item = &'a WalletStats>) -> Self {
        let mut global = GlobalStats::default();
        for stats in wallets {
            global.total_bets += stats.total_bets;
            global.successful_bets += stats.successful_bets;
            global.failed_bets += stats.failed_bets;
            global.daily_claims += stats.daily_claims;
            global.wallets += 1;
        }
        global
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bet_counters_are_exclusive() {
        let mut stats = WalletStats::default();
        stats.record_bet_success();
        stats.record_bet_success();
        stats.record_bet_failure();
        assert_eq!(stats.total_bets, 3);
        assert_eq!(stats.successful_bets, 2);
        assert_eq!(stats.failed_bets, 1);
        assert_eq!(
            stats.total_bets,
            stats.successful_bets + stats.failed_bets
        );
    }

    #[test]
    fn test_aggregate() {
        let mut a = WalletStats::default();
        a.record_bet_success();
        a.record_daily_claim();
        let mut b = WalletStats::default();
        b.record_bet_failure();

        let global = GlobalStats::aggregate([&a, &b]);
        assert_eq!(global.total_bets, 2);
        assert_eq!(global.successful_bets, 1);
        assert_eq!(global.failed_bets, 1);
        assert_eq!(global.daily_claims, 1);
        assert_eq!(global.wallets, 2);
    }

    #[test]
    fn test_aggregate_empty() {
        let global = GlobalStats::aggregate([]);
        assert_eq!(global, GlobalStats::default());
    }
}
