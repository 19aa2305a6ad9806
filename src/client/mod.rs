//! Prediction-market API access
//!
//! Per-identity HTTP client plus the request/response types the wagering API
//! trades in.

mod api;
mod types;

pub use api::PredictionClient;
pub use types::{CooldownInfo, Outcome, ServerResult, WagerDecision, WagerReceipt, WagerRecord};
