//! Search request models.

use serde::{Deserialize, Serialize};

/// Default submission-date window in days
pub const DEFAULT_DAYS_BACK: i64 = 30;
/// Default result cap
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Sort field accepted by the arXiv API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    Relevance,
    SubmittedDate,
    LastUpdatedDate,
}

impl SortBy {
    /// Wire value for the `sortBy` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevance => "relevance",
            SortBy::SubmittedDate => "submittedDate",
            SortBy::LastUpdatedDate => "lastUpdatedDate",
        }
    }
}

/// Sort order accepted by the arXiv API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Wire value for the `sortOrder` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        }
    }
}

/// A free-text research interest plus search bounds.
///
/// Immutable input to the query synthesizer; validated before any network
/// call is made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequirement {
    /// Free-text description of the research interest
    pub requirement: String,

    /// Submission-date window in calendar days (must be >= 0)
    pub days_back: i64,

    /// Maximum number of results to return (must be > 0)
    pub max_results: usize,

    /// Optional author name, ANDed into the final expression as `au:"..."`
    pub author: Option<String>,
}

impl SearchRequirement {
    /// Create a requirement with default window and cap
    pub fn new(requirement: impl Into<String>) -> Self {
        Self {
            requirement: requirement.into(),
            days_back: DEFAULT_DAYS_BACK,
            max_results: DEFAULT_MAX_RESULTS,
            author: None,
        }
    }

    /// Set the submission-date window
    pub fn days_back(mut self, days: i64) -> Self {
        self.days_back = days;
        self
    }

    /// Set the result cap
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    /// Restrict results to a specific author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Check the bounds the synthesizer and search adapter rely on.
    pub fn validate(&self) -> Result<(), InvalidRequirement> {
        if self.requirement.trim().is_empty() {
            return Err(InvalidRequirement::EmptyRequirement);
        }
        if self.days_back < 0 {
            return Err(InvalidRequirement::NegativeWindow(self.days_back));
        }
        if self.max_results == 0 {
            return Err(InvalidRequirement::ZeroCap);
        }
        Ok(())
    }
}

/// Validation failures for a [`SearchRequirement`]
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidRequirement {
    #[error("Requirement text must not be empty")]
    EmptyRequirement,

    #[error("Day window must not be negative, got {0}")]
    NegativeWindow(i64),

    #[error("Result cap must be greater than zero")]
    ZeroCap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let req = SearchRequirement::new("machine learning");
        assert_eq!(req.days_back, 30);
        assert_eq!(req.max_results, 10);
        assert!(req.author.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_requirement() {
        let req = SearchRequirement::new("   ");
        assert_eq!(
            req.validate(),
            Err(InvalidRequirement::EmptyRequirement)
        );
    }

    #[test]
    fn test_rejects_bad_bounds() {
        assert_eq!(
            SearchRequirement::new("quantum").days_back(-1).validate(),
            Err(InvalidRequirement::NegativeWindow(-1))
        );
        assert_eq!(
            SearchRequirement::new("quantum").max_results(0).validate(),
            Err(InvalidRequirement::ZeroCap)
        );
    }

    #[test]
    fn test_sort_wire_values() {
        assert_eq!(SortBy::SubmittedDate.as_str(), "submittedDate");
        assert_eq!(SortOrder::Descending.as_str(), "descending");
    }
}
