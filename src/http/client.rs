//! HTTP session factory with built-in retry handling.

use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;

use super::retry::{FetchError, RetryPolicy, classify_error};

/// User agent presented to every source.
const USER_AGENT: &str = "cloudsku-cli";

/// HTTP client bound to a retry policy, built once per run and reused
/// across all fetch operations.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    policy: RetryPolicy,
}

impl HttpClient {
    /// Builds a session for the given policy. Fails fast on an invalid
    /// policy and issues no network calls.
    pub fn new(policy: RetryPolicy) -> Result<Self> {
        policy.validate()?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(policy.timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client, policy })
    }

    /// Builds a session with the default retry policy.
    pub fn with_defaults() -> Result<Self> {
        Self::new(RetryPolicy::default())
    }

    /// Returns the policy this session was built with.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Returns a reference to the underlying reqwest Client.
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Performs a GET request and deserializes the JSON response.
    ///
    /// Transient failures (forcelisted statuses, connection errors) are
    /// retried with exponential backoff up to the policy's retry count.
    /// Timeouts, terminal statuses and undecodable bodies surface
    /// immediately as a [`FetchError`] the caller can match on.
    #[tracing::instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET JSON from {}...", url);

        let mut attempts = 0u32;
        loop {
            let err = match self.get_json_once(url).await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            attempts += 1;

            if !err.is_transient() || !self.policy.retries_method(&Method::GET) {
                debug!("GET {}: not retrying: {}", url, err);
                return Err(err.into());
            }
            if attempts > self.policy.total {
                return Err(anyhow::Error::from(err))
                    .with_context(|| format!("GET {} failed after {} attempts", url, attempts));
            }

            let delay = self.policy.backoff_delay(attempts);
            warn!(
                "GET {}: attempt {} failed ({}), retrying in {:.1}s...",
                url,
                attempts,
                err,
                delay.as_secs_f64()
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Single request attempt without retry.
    async fn get_json_once<T: DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| classify_error(&err))?;

        let status = response.status();
        if !status.is_success() {
            if self.policy.retries_status(status) {
                return Err(FetchError::Transient(format!("HTTP {} response", status)));
            }
            return Err(FetchError::Status(status));
        }

        response.json::<T>().await.map_err(|err| classify_error(&err))
    }
}
