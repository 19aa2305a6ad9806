//! Solver protocol types

/// The kind of challenge guarding a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeKind {
    Recaptcha,
    Hcaptcha,
}

/// One CAPTCHA challenge to be solved off-box.
#[derive(Debug, Clone)]
pub struct ChallengeSpec {
    pub kind: ChallengeKind,
    pub site_key: String,
    pub page_url: String,
}

impl ChallengeSpec {
    pub fn recaptcha(site_key: &str, page_url: &str) -> Self {
        Self {
            kind: ChallengeKind::Recaptcha,
            site_key: site_key.to_string(),
            page_url: page_url.to_string(),
        }
    }

    pub fn hcaptcha(site_key: &str, page_url: &str) -> Self {
        Self {
            kind: ChallengeKind::Hcaptcha,
            site_key: site_key.to_string(),
            page_url: page_url.to_string(),
        }
    }

    /// Submission methods to try, in order. reCAPTCHA challenges are
    /// submitted as enterprise v2 first and plain v3 second because the
    /// solver rejects the wrong variant with an immediate error rather than
    /// a failed solve.
    pub fn methods(&self) -> Vec<SubmitMethod> {
        match self.kind {
            ChallengeKind::Recaptcha => vec![
                SubmitMethod {
                    method: "userrecaptcha",
                    extra: &[("enterprise", "1")],
                },
                SubmitMethod {
                    method: "userrecaptcha3",
                    extra: &[("version", "v3")],
                },
            ],
            ChallengeKind::Hcaptcha => vec![SubmitMethod {
                method: "hcaptcha",
                extra: &[],
            }],
        }
    }
}

/// One way of presenting a challenge to the solver's submit endpoint.
#[derive(Debug, Clone, Copy)]
pub struct SubmitMethod {
    pub method: &'static str,
    pub extra: &'static [(&'static str, &'static str)],
}

/// Decoded state of an in-flight solver task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    /// Still being worked on; poll again.
    Polling,
    /// Solved; the token is ready.
    Ready(String),
    /// The solver gave up on this challenge.
    Unsolvable,
    /// The solver rejected our account (bad key, empty balance).
    Rejected(String),
}
