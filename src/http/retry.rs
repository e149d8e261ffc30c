//! Retry policy for network operations with error classification.

use std::time::Duration;

use anyhow::{Result, bail};
use reqwest::{Method, StatusCode};

/// Default number of retries after the initial attempt.
pub const DEFAULT_RETRIES: u32 = 5;

/// Default base of the exponential delay between retries, in seconds.
pub const DEFAULT_BACKOFF_FACTOR: f64 = 5.0;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Statuses treated as transient server-side failures.
pub const DEFAULT_STATUS_FORCELIST: [u16; 5] = [429, 500, 502, 503, 504];

/// Retry configuration shared by every request a session issues.
///
/// Retries cover transport failures and forcelisted statuses only; an
/// application-level failure (terminal status, undecodable body) is never
/// retried.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries allowed after the initial attempt.
    pub total: u32,
    /// Response statuses that trigger a retry.
    pub status_forcelist: Vec<StatusCode>,
    /// Base of the exponential delay between retries, in seconds.
    pub backoff_factor: f64,
    /// Methods eligible for automatic retry. Idempotent methods only.
    pub allowed_methods: Vec<Method>,
    /// Per-request timeout applied by the session.
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            total: DEFAULT_RETRIES,
            status_forcelist: DEFAULT_STATUS_FORCELIST
                .iter()
                .filter_map(|&code| StatusCode::from_u16(code).ok())
                .collect(),
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            allowed_methods: vec![Method::GET],
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl RetryPolicy {
    /// Rejects configurations that cannot be executed. Issues no network
    /// calls.
    pub fn validate(&self) -> Result<()> {
        if !self.backoff_factor.is_finite() || self.backoff_factor < 0.0 {
            bail!("Invalid backoff factor: {}", self.backoff_factor);
        }
        if self.timeout.is_zero() {
            bail!("Request timeout must be greater than zero");
        }
        if self.allowed_methods.is_empty() {
            bail!("At least one HTTP method must be eligible for retry");
        }
        Ok(())
    }

    /// Whether a response status should be retried.
    pub fn retries_status(&self, status: StatusCode) -> bool {
        self.status_forcelist.contains(&status)
    }

    /// Whether requests with this method may be retried.
    pub fn retries_method(&self, method: &Method) -> bool {
        self.allowed_methods.contains(method)
    }

    /// Delay before retry `attempt` (1-based): `backoff_factor * 2^(attempt-1)`.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        Duration::from_secs_f64(self.backoff_factor * f64::from(1u32 << exponent))
    }
}

/// Failures surfaced by the HTTP layer once retry handling is done.
#[derive(Debug)]
pub enum FetchError {
    /// The request exceeded the per-request timeout.
    Timeout,
    /// The server answered with a status the policy does not retry.
    Status(StatusCode),
    /// Transport failure or forcelisted status, either ineligible for
    /// retry or still failing after every allowed attempt.
    Transient(String),
    /// The response body could not be decoded as the expected shape.
    Decode(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout)
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Transient(_))
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Timeout => write!(f, "Request timed out"),
            FetchError::Status(status) => write!(f, "HTTP {} response", status.as_u16()),
            FetchError::Transient(msg) => write!(f, "Transient failure: {}", msg),
            FetchError::Decode(msg) => write!(f, "Failed to decode response body: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Classifies a `reqwest` error into the retry taxonomy. Timeouts and
/// decode failures are terminal for the attempt; everything else at the
/// transport level is transient.
pub fn classify_error(error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_decode() {
        FetchError::Decode(error.to_string())
    } else {
        FetchError::Transient(error.to_string())
    }
}
