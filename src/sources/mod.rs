//! Search-API adapters.
//!
//! The only live adapter is [`ArxivClient`]; everything downstream of it
//! works on [`crate::models::PaperRecord`] and does not care where records
//! came from.

mod arxiv;

pub use arxiv::ArxivClient;

/// Errors that can occur when talking to a search API
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// API error from the source
    #[error("API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}
