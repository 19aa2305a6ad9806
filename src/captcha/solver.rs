//! CAPTCHA solver client
//!
//! Talks the classic pipe-delimited in.php/res.php protocol. Each solve can
//! be pinned to the same proxy the protected request will use, since anti-bot
//! checks compare the solving IP with the claiming IP. A shutdown signal
//! aborts an in-flight solve at the next suspension point.

use super::types::{ChallengeSpec, TaskStatus};
use crate::config::CaptchaConfig;
use crate::error::CaptchaError;
use crate::wallet::ProxySpec;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

const SUBMIT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct CaptchaSolver {
    config: CaptchaConfig,
    api_key: String,
}

impl CaptchaSolver {
    /// Build a solver, failing when no API key is configured.
    pub fn new(config: &CaptchaConfig) -> Result<Self, CaptchaError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CaptchaError::Failed("no solver API key configured".to_string()))?;
        Ok(Self {
            config: config.clone(),
            api_key,
        })
    }

    fn build_http(&self, proxy: Option<&ProxySpec>) -> Result<reqwest::Client, CaptchaError> {
        let mut builder = reqwest::Client::builder().timeout(SUBMIT_TIMEOUT);
        // Some deployments sit behind a bare IP whose certificate does not
        // match; relaxing verification is an explicit opt-in.
        if self.config.accept_invalid_certs {
            builder = builder.danger_accept_invalid_certs(true);
        }
        if let Some(proxy) = proxy {
            builder = builder.proxy(
                proxy
                    .to_proxy()
                    .map_err(|e| CaptchaError::Failed(format!("bad proxy: {e}")))?,
            );
        }
        builder
            .build()
            .map_err(|e| CaptchaError::Failed(format!("client build failed: {e}")))
    }

    /// Solve a challenge end to end, polling until the token is ready, the
    /// configured timeout elapses, or `cancel` fires.
    pub async fn solve(
        &self,
        challenge: &ChallengeSpec,
        proxy: Option<&ProxySpec>,
        cancel: &CancellationToken,
    ) -> Result<String, CaptchaError> {
        let http = self.build_http(proxy)?;
        let task_id = self.submit(&http, challenge, cancel).await?;
        tracing::debug!(task = %task_id, "challenge submitted");
        self.poll(&http, &task_id, cancel).await
    }

    /// Submit the challenge, trying each method the challenge admits until
    /// one is accepted.
    async fn submit(
        &self,
        http: &reqwest::Client,
        challenge: &ChallengeSpec,
        cancel: &CancellationToken,
    ) -> Result<String, CaptchaError> {
        let mut last_response = String::new();
        for method in challenge.methods() {
            if cancel.is_cancelled() {
                return Err(CaptchaError::Cancelled);
            }
            let mut params = vec![
                ("key", self.api_key.clone()),
                ("method", method.method.to_string()),
                ("sitekey", challenge.site_key.clone()),
                ("pageurl", challenge.page_url.clone()),
            ];
            for (k, v) in method.extra {
                params.push((k, v.to_string()));
            }

            let response = http
                .get(format!("{}/in.php", self.config.base_url.trim_end_matches('/')))
                .query(&params)
                .send()
                .await?;
            let body = response.text().await?;

            if let Some(task_id) = body.trim().strip_prefix("OK|") {
                return Ok(task_id.to_string());
            }
            tracing::debug!(
                method = method.method,
                response = %body.trim(),
                "submit method not accepted"
            );
            last_response = body;
        }
        Err(CaptchaError::Failed(format!(
            "all submit methods rejected, last response: {}",
            last_response.trim()
        )))
    }

    /// Poll until a terminal status, the deadline, or cancellation.
    async fn poll(
        &self,
        http: &reqwest::Client,
        task_id: &str,
        cancel: &CancellationToken,
    ) -> Result<String, CaptchaError> {
        let interval = Duration::from_secs(self.config.poll_interval_secs);
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let deadline = Instant::now() + timeout;
        let url = format!(
            "{}/res.php?key={}&action=get&id={}",
            self.config.base_url.trim_end_matches('/'),
            self.api_key,
            task_id
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Err(CaptchaError::Cancelled),
                _ = tokio::time::sleep(interval) => {}
            }
            if Instant::now() >= deadline {
                return Err(CaptchaError::TimedOut(timeout));
            }

            let response = tokio::select! {
                _ = cancel.cancelled() => return Err(CaptchaError::Cancelled),
                r = http.get(&url).send() => r,
            };
            let body = match response {
                Ok(resp) => resp.text().await.unwrap_or_default(),
                Err(e) => {
                    // Transient poll failures are retried until the deadline.
                    tracing::debug!(error = %e, "poll request failed");
                    continue;
                }
            };

            match parse_poll_response(&body) {
                TaskStatus::Polling => continue,
                TaskStatus::Ready(token) => return Ok(token),
                TaskStatus::Unsolvable => {
                    return Err(CaptchaError::Unsolvable(body.trim().to_string()))
                }
                TaskStatus::Rejected(detail) => return Err(CaptchaError::Rejected(detail)),
            }
        }
    }
}

/// Decode one res.php body into a task status.
///
/// The protocol is pipe-delimited text with loosely specified variants; a
/// long bare body with no known marker is treated as the token itself, which
/// some deployments return once solved.
pub fn parse_poll_response(body: &str) -> TaskStatus {
    let trimmed = body.trim();

    if let Some(token) = trimmed.strip_prefix("OK|") {
        return TaskStatus::Ready(token.to_string());
    }
    if matches!(trimmed, "CAPCHA_NOT_READY" | "NOT_READY" | "PROCESSING") {
        return TaskStatus::Polling;
    }
    if trimmed.contains("UNSOLVABLE") {
        return TaskStatus::Unsolvable;
    }
    if trimmed.contains("WRONG_USER_KEY") || trimmed.contains("ZERO_BALANCE") {
        return TaskStatus::Rejected(trimmed.to_string());
    }
    if trimmed.len() > 50 && !trimmed.contains('|') {
        return TaskStatus::Ready(trimmed.to_string());
    }
    // Unknown errors and unrecognized short bodies are retried until the
    // deadline; only the statuses above are terminal.
    TaskStatus::Polling
}
