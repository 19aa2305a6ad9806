//! Outcome selection
//!
//! Contrarian by default: the side holding less wagered volume is assumed
//! underpriced by herd behavior, so the bet goes there. A configurable
//! random-bypass probability skips the analysis entirely to keep the account's
//! pattern from looking mechanical.

use crate::client::{Outcome, WagerRecord};
use rand::Rng;
use rust_decimal::Decimal;

/// Aggregated wagered volume on each side of a market.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketSnapshot {
    pub yes_total: Decimal,
    pub no_total: Decimal,
}

impl MarketSnapshot {
    /// Fold a bet listing into per-side totals. Records with an
    /// unrecognizable outcome are ignored.
    pub fn from_records(records: &[WagerRecord]) -> Self {
        let mut yes_total = Decimal::ZERO;
        let mut no_total = Decimal::ZERO;
        for record in records {
            match record.outcome() {
                Some(Outcome::Yes) => yes_total += record.amount(),
                Some(Outcome::No) => no_total += record.amount(),
                None => {}
            }
        }
        Self {
            yes_total,
            no_total,
        }
    }

    /// The less-wagered side, or `None` on an exact tie.
    pub fn minority_side(&self) -> Option<Outcome> {
        use std::cmp::Ordering;
        match self.yes_total.cmp(&self.no_total) {
            Ordering::Less => Some(Outcome::Yes),
            Ordering::Greater => Some(Outcome::No),
            Ordering::Equal => None,
        }
    }
}

/// Pick an outcome for a market.
///
/// With probability `bypass_probability` (and always when no snapshot is
/// available or the sides are tied) the choice is uniform random.
pub fn choose_outcome<R: Rng>(
    snapshot: Option<&MarketSnapshot>,
    bypass_probability: f64,
    rng: &mut R,
) -> Outcome {
    if bypass_probability > 0.0 && rng.gen_bool(bypass_probability.clamp(0.0, 1.0)) {
        tracing::debug!("analysis bypassed, choosing at random");
        return random_outcome(rng);
    }

    match snapshot.and_then(MarketSnapshot::minority_side) {
        Some(side) => side,
        None => random_outcome(rng),
    }
}

fn random_outcome<R: Rng>(rng: &mut R) -> Outcome {
    if rng.gen_bool(0.5) {
        Outcome::Yes
    } else {
        Outcome::No
    }
}
