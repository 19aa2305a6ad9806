//! Ink mystery-faucet client
//!
//! The backend takes a plain JSON body with the address and chain id; the
//! hCaptcha on the page is handled entirely client-side by the site, so no
//! token accompanies the claim request.

use super::types::FaucetResult;
use crate::config::FaucetConfig;
use crate::wallet::Identity;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const CLAIM_TIMEOUT: Duration = Duration::from_secs(30);

pub struct InkFaucet<'a> {
    config: &'a FaucetConfig,
}

impl<'a> InkFaucet<'a> {
    pub fn new(config: &'a FaucetConfig) -> Self {
        Self { config }
    }

    pub async fn claim(&self, identity: &Identity, cancel: &CancellationToken) -> FaucetResult {
        if cancel.is_cancelled() {
            return FaucetResult::Skipped("shutdown requested".to_string());
        }
        let http = match build_http(identity, &self.config.ink_page_url) {
            Ok(http) => http,
            Err(e) => return FaucetResult::Failed(format!("client build failed: {e}")),
        };

        let payload = serde_json::json!({
            "address": identity.address,
            "chainId": self.config.ink_chain_id,
        });

        let response = http
            .post(&self.config.ink_url)
            .timeout(CLAIM_TIMEOUT)
            .json(&payload)
            .send()
            .await;

        let response = match response {
            Ok(resp) => resp,
            Err(e) => return FaucetResult::Failed(format!("claim request failed: {e}")),
        };
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            // A 200 is a claim even when the body is not JSON.
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or_else(|| "claimed".to_string());
            FaucetResult::Claimed(detail)
        } else {
            let snippet: String = body.chars().take(200).collect();
            FaucetResult::Failed(format!("HTTP {status}: {snippet}"))
        }
    }
}

fn build_http(identity: &Identity, page_url: &str) -> anyhow::Result<reqwest::Client> {
    use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};

    let origin = page_url.trim_end_matches('/');
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
             (KHTML, like Gecko) Chrome/144.0.0.0 Safari/537.36",
        ),
    );
    headers.insert("origin", HeaderValue::from_str(origin)?);
    headers.insert("referer", HeaderValue::from_str(&format!("{origin}/"))?);

    let mut builder = reqwest::Client::builder()
        .default_headers(headers)
        .cookie_store(true);
    if let Some(proxy) = &identity.proxy {
        builder = builder.proxy(proxy.to_proxy()?);
    }
    Ok(builder.build()?)
}
