//! Core data models for papers, researchers, and search requests.

pub mod paper;
pub mod researcher;
pub mod search;

pub use paper::{PaperBuilder, PaperRecord};
pub use researcher::ResearcherRecord;
pub use search::{SearchRequirement, SortBy, SortOrder};
