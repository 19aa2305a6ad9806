//! inkpredict-bot: multi-wallet automation for the InkPredict prediction market
//!
//! This library provides the core components for:
//! - Wallet identity loading with key-derived addresses and per-wallet proxies
//! - A resilient client for the undocumented wagering API
//! - Contrarian outcome selection with a random-bypass element
//! - Daily reward claiming with cooldown classification
//! - Testnet faucet claiming behind an off-box CAPTCHA solver
//! - A sequential multi-wallet orchestrator with jittered pacing
//! - Graceful Ctrl+C shutdown between requests

pub mod captcha;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod faucet;
pub mod strategy;
pub mod telemetry;
pub mod trader;
pub mod wallet;
