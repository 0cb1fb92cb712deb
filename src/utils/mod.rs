//! Utility modules supporting the search and extraction pipelines.
//!
//! - [`HttpClient`]: shared HTTP client with bounded timeouts
//! - [`RetryConfig`] / [`with_retry`]: exponential backoff for API calls

mod http;
mod retry;

pub use http::HttpClient;
pub use retry::{api_retry_config, with_retry, RetryConfig};
