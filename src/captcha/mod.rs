//! Off-box CAPTCHA solving
//!
//! Challenge descriptions, the solver-service client and poll-response
//! decoding.

mod solver;
mod types;

pub use solver::{parse_poll_response, CaptchaSolver};
pub use types::{ChallengeKind, ChallengeSpec, SubmitMethod, TaskStatus};
