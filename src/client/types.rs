//! Market API client types

use crate::error::BestEffort;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Binary market outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Yes,
    No,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Yes => "YES",
            Outcome::No => "NO",
        }
    }

    /// Lenient parse of server-side outcome strings.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "YES" => Some(Outcome::Yes),
            "NO" => Some(Outcome::No),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wager about to be placed. Produced fresh per attempt, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WagerDecision {
    pub market_id: u64,
    pub outcome: Outcome,
    pub amount: Decimal,
}

impl WagerDecision {
    /// Canonical message signed alongside the wager:
    /// `{address}:{market_id}:{outcome}:{amount}`.
    pub fn signing_message(&self, address: &str) -> String {
        format!(
            "{}:{}:{}:{}",
            address, self.market_id, self.outcome, self.amount
        )
    }
}

/// One wager record as returned by the market's bet listing.
///
/// The endpoint's schema is unconfirmed; amounts arrive as numbers or
/// strings and unknown fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct WagerRecord {
    #[serde(default)]
    amount: serde_json::Value,
    #[serde(default)]
    outcome: String,
}

impl WagerRecord {
    pub fn amount(&self) -> Decimal {
        match &self.amount {
            serde_json::Value::Number(n) => n
                .as_f64()
                .and_then(Decimal::from_f64)
                .unwrap_or(Decimal::ZERO),
            serde_json::Value::String(s) => Decimal::from_str(s.trim()).unwrap_or(Decimal::ZERO),
            _ => Decimal::ZERO,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        Outcome::parse(&self.outcome)
    }

    #[cfg(test)]
    pub fn new_for_test(amount: &str, outcome: &str) -> Self {
        Self {
            amount: serde_json::Value::String(amount.to_string()),
            outcome: outcome.to_string(),
        }
    }
}

/// Raw JSON body returned by the server for mutating operations.
pub type ServerResult = serde_json::Value;

/// Result of placing a wager, carrying the signing outcome separately so the
/// caller can see whether the request went out signed.
#[derive(Debug, Clone)]
pub struct WagerReceipt {
    pub response: ServerResult,
    pub signature: BestEffort,
}

/// Cooldown information for the daily reward.
///
/// No endpoint reliably exposes this ahead of a claim attempt; the struct
/// exists for the day the API grows one.
#[derive(Debug, Clone)]
pub struct CooldownInfo {
    pub detail: String,
}
