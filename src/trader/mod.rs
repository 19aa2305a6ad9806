//! Trading orchestration
//!
//! One [`WalletTrader`] per identity, driven sequentially by the
//! [`AutoTrader`]. Wallets are isolated: an attempt failing on one wallet is
//! counted and logged, never propagated to the others.

mod auto;
mod stats;
mod wallet;

pub use auto::AutoTrader;
pub use stats::{GlobalStats, WalletStats};
pub use wallet::WalletTrader;
