//! Error taxonomy for the bot
//!
//! The target API has no documented contract, so failure classification is
//! heuristic: non-2xx claim responses are bucketed by substring matching on
//! the body. The phrase lists live in exactly one place
//! ([`classify_claim_response`]) and feed both the success-path status check
//! and the error path.

use thiserror::Error;

/// Fatal startup error: no usable credential source.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no wallets found: neither {wallets_file} nor {keys_file} yielded a usable identity")]
    NoIdentities {
        wallets_file: String,
        keys_file: String,
    },
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Recoverable errors from the market API client.
///
/// None of these abort processing of other wallets or remaining attempts;
/// the orchestrator logs them and folds them into the failure counters.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or proxy failure before a response was received.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-2xx response that matched no known phrase.
    #[error("api error {status}: {body}")]
    Api { status: u16, body: String },

    /// Daily reward is time-gated right now.
    #[error("daily reward on cooldown")]
    CooldownActive,

    /// Daily reward was already collected today.
    #[error("daily reward already claimed: {0}")]
    AlreadyClaimed(String),
}

impl ClientError {
    /// Informational conditions that are not failures for reporting purposes.
    pub fn is_informational(&self) -> bool {
        matches!(
            self,
            ClientError::CooldownActive | ClientError::AlreadyClaimed(_)
        )
    }
}

/// Terminal outcomes of one CAPTCHA solving attempt.
///
/// Terminal for the current attempt only; `Rejected` additionally signals a
/// configuration-level problem (bad key, empty balance) that makes future
/// tasks pointless.
#[derive(Debug, Error)]
pub enum CaptchaError {
    /// The service signalled it can never solve this challenge.
    #[error("captcha unsolvable: {0}")]
    Unsolvable(String),

    /// Wrong API key or zero balance on the solving service.
    #[error("captcha request rejected by service: {0}")]
    Rejected(String),

    /// Every submission method was refused; no task was created.
    #[error("captcha submission failed: {0}")]
    Failed(String),

    /// The caller-supplied polling deadline elapsed.
    #[error("captcha not solved within {0:?}")]
    TimedOut(std::time::Duration),

    /// Shutdown was requested while the task was in flight.
    #[error("captcha solve cancelled by shutdown")]
    Cancelled,

    /// Network failure talking to the solving service.
    #[error("captcha transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Classify a daily-claim response by status code and body text.
///
/// Returns `Ok(())` for 2xx. For everything else the body is matched
/// case-insensitively against the known cooldown and already-claimed phrases;
/// unmatched responses surface as an unclassified [`ClientError::Api`].
pub fn classify_claim_response(status: u16, body: &str) -> Result<(), ClientError> {
    if (200..300).contains(&status) {
        return Ok(());
    }

    let lower = body.to_lowercase();

    const COOLDOWN_PHRASES: [&str; 3] = ["cooldown", "wait", "too soon"];
    const CLAIMED_PHRASES: [&str; 2] = ["already claimed", "come back tomorrow"];

    // "already claimed" wins over "wait": bodies like "already claimed, come
    // back tomorrow" often also mention waiting.
    if CLAIMED_PHRASES.iter().any(|p| lower.contains(p)) {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
            .unwrap_or_else(|| "already claimed today".to_string());
        return Err(ClientError::AlreadyClaimed(detail));
    }

    if COOLDOWN_PHRASES.iter().any(|p| lower.contains(p)) {
        return Err(ClientError::CooldownActive);
    }

    Err(ClientError::Api {
        status,
        body: body.to_string(),
    })
}

/// Outcome of a best-effort operation.
///
/// Operations like referral registration and request signing are allowed to
/// fail without blocking the caller, but the distinction between "confirmed"
/// and "probably worked via a side channel" is preserved instead of being
/// collapsed into a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestEffort {
    /// The primary mechanism confirmed success.
    Succeeded,
    /// Only the fallback mechanism worked; treat as a weak success signal.
    SucceededViaFallback,
    /// Nothing worked.
    Failed,
}

impl BestEffort {
    /// Weak-success check: true unless the operation outright failed.
    pub fn probably_ok(&self) -> bool {
        !matches!(self, BestEffort::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_success() {
        assert!(classify_claim_response(200, r#"{"success":true}"#).is_ok());
        assert!(classify_claim_response(201, "").is_ok());
    }

    #[test]
    fn test_classify_cooldown_phrases() {
        for body in ["Cooldown active", "please WAIT", "too soon, slow down"] {
            let err = classify_claim_response(400, body).unwrap_err();
            assert!(matches!(err, ClientError::CooldownActive), "body: {body}");
        }
    }

    #[test]
    fn test_classify_already_claimed() {
        let err = classify_claim_response(429, "Already Claimed today").unwrap_err();
        assert!(matches!(err, ClientError::AlreadyClaimed(_)));

        let err = classify_claim_response(400, "come back tomorrow!").unwrap_err();
        assert!(matches!(err, ClientError::AlreadyClaimed(_)));
    }

    #[test]
    fn test_classify_already_claimed_extracts_json_error() {
        let body = r#"{"error":"Already claimed, come back tomorrow"}"#;
        match classify_claim_response(400, body).unwrap_err() {
            ClientError::AlreadyClaimed(msg) => {
                assert_eq!(msg, "Already claimed, come back tomorrow")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_claimed_wins_over_cooldown() {
        let err = classify_claim_response(400, "already claimed, please wait").unwrap_err();
        assert!(matches!(err, ClientError::AlreadyClaimed(_)));
    }

    #[test]
    fn test_classify_unmatched_is_api_error() {
        match classify_claim_response(500, "internal error").unwrap_err() {
            ClientError::Api { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal error");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_informational_errors() {
        assert!(ClientError::CooldownActive.is_informational());
        assert!(ClientError::AlreadyClaimed("x".into()).is_informational());
        assert!(!ClientError::Api {
            status: 500,
            body: String::new()
        }
        .is_informational());
    }

    #[test]
    fn test_best_effort_probably_ok() {
        assert!(BestEffort::Succeeded.probably_ok());
        assert!(BestEffort::SucceededViaFallback.probably_ok());
        assert!(!BestEffort::Failed.probably_ok());
    }
}
