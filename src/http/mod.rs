//! HTTP session factory with retry handling and error classification.

mod client;
mod retry;

pub use client::HttpClient;
pub use retry::{
    DEFAULT_BACKOFF_FACTOR, DEFAULT_RETRIES, DEFAULT_STATUS_FORCELIST, DEFAULT_TIMEOUT, FetchError,
    RetryPolicy, classify_error,
};
