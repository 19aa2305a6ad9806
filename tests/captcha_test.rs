//! Integration tests driving the solver's submit/poll loop against a
//! loopback server

use inkpredict_bot::captcha::{CaptchaSolver, ChallengeSpec};
use inkpredict_bot::config::CaptchaConfig;
use inkpredict_bot::error::CaptchaError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_util::sync::CancellationToken;

/// A solver endpoint: `in.php` always accepts the task, `res.php` always
/// answers with `res_body`. Poll hits are counted.
async fn spawn_solver_service(res_body: &'static str) -> (String, Arc<AtomicUsize>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let poll_hits = Arc::new(AtomicUsize::new(0));
    let hits = poll_hits.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let hits = hits.clone();
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let Ok(n) = stream.read(&mut buf).await else {
                    return;
                };
                let request = String::from_utf8_lossy(&buf[..n]);
                let body = if request.contains("/in.php") {
                    "OK|42"
                } else {
                    hits.fetch_add(1, Ordering::SeqCst);
                    res_body
                };
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: text/plain\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = stream.write_all(response.as_bytes()).await;
                let _ = stream.shutdown().await;
            });
        }
    });
    (format!("http://{addr}"), poll_hits)
}

fn solver_config(base_url: String) -> CaptchaConfig {
    CaptchaConfig {
        api_key: Some("test-key".to_string()),
        base_url,
        poll_interval_secs: 1,
        timeout_secs: 2,
        accept_invalid_certs: false,
    }
}

fn challenge() -> ChallengeSpec {
    ChallengeSpec::recaptcha("sitekey", "https://example.test")
}

#[tokio::test]
async fn test_never_ready_times_out_and_stops_polling() {
    let (base, poll_hits) = spawn_solver_service("CAPCHA_NOT_READY").await;
    let solver = CaptchaSolver::new(&solver_config(base)).unwrap();
    let cancel = CancellationToken::new();

    let err = solver.solve(&challenge(), None, &cancel).await.unwrap_err();
    assert!(matches!(err, CaptchaError::TimedOut(_)));

    // No polls may land after the deadline fired.
    let hits_at_timeout = poll_hits.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(poll_hits.load(Ordering::SeqCst), hits_at_timeout);
}

#[tokio::test]
async fn test_unsolvable_is_terminal() {
    let (base, poll_hits) = spawn_solver_service("ERROR_CAPTCHA_UNSOLVABLE").await;
    let solver = CaptchaSolver::new(&solver_config(base)).unwrap();
    let cancel = CancellationToken::new();

    let err = solver.solve(&challenge(), None, &cancel).await.unwrap_err();
    assert!(matches!(err, CaptchaError::Unsolvable(_)));

    assert_eq!(poll_hits.load(Ordering::SeqCst), 1);
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(poll_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_rejected_is_terminal() {
    let (base, poll_hits) = spawn_solver_service("ERROR_WRONG_USER_KEY").await;
    let solver = CaptchaSolver::new(&solver_config(base)).unwrap();
    let cancel = CancellationToken::new();

    let err = solver.solve(&challenge(), None, &cancel).await.unwrap_err();
    assert!(matches!(err, CaptchaError::Rejected(_)));

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(poll_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_solved_token_returned() {
    let (base, _) = spawn_solver_service("OK|the-token").await;
    let solver = CaptchaSolver::new(&solver_config(base)).unwrap();
    let cancel = CancellationToken::new();

    let token = solver.solve(&challenge(), None, &cancel).await.unwrap();
    assert_eq!(token, "the-token");
}

/// A token cancelled before the solve starts returns immediately, without
/// waiting out the polling timeout or touching the poll endpoint.
#[tokio::test]
async fn test_cancelled_before_solve_returns_immediately() {
    let (base, poll_hits) = spawn_solver_service("CAPCHA_NOT_READY").await;
    let solver = CaptchaSolver::new(&solver_config(base)).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();

    let started = std::time::Instant::now();
    let err = solver.solve(&challenge(), None, &cancel).await.unwrap_err();
    assert!(matches!(err, CaptchaError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(poll_hits.load(Ordering::SeqCst), 0);
}

/// Cancellation mid-poll interrupts the sleep instead of letting the solve
/// run to its deadline.
#[tokio::test]
async fn test_cancelled_mid_poll_returns_promptly() {
    let (base, _) = spawn_solver_service("CAPCHA_NOT_READY").await;
    let mut config = solver_config(base);
    config.poll_interval_secs = 5;
    config.timeout_secs = 60;
    let solver = CaptchaSolver::new(&config).unwrap();

    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let err = solver.solve(&challenge(), None, &cancel).await.unwrap_err();
    assert!(matches!(err, CaptchaError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(2));
}
