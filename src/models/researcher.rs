//! Researcher model produced by contact extraction.

use serde::{Deserialize, Serialize};

/// Maximum number of research-area tags kept after enrichment
pub const MAX_RESEARCH_AREAS: usize = 5;

/// Contact and affiliation details for a single researcher.
///
/// Built by the contact extraction engine from first-page PDF text; every
/// field other than `name` is best-effort and stays `None` when nothing
/// matched. The enrichment pass may fill the profile fields afterwards, but
/// never resets a populated field back to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearcherRecord {
    /// Display name as matched in the text (required, non-empty)
    pub name: String,

    /// Email address
    pub email: Option<String>,

    /// ORCID iD, normalized to the bare identifier (0000-0000-0000-0000)
    pub orcid: Option<String>,

    /// Institution line as it appeared in the text
    pub institution: Option<String>,

    /// Personal or project website
    pub website: Option<String>,

    /// LinkedIn profile URL (enrichment)
    pub linkedin: Option<String>,

    /// Google Scholar profile URL (enrichment)
    pub google_scholar: Option<String>,

    /// ResearchGate profile URL (enrichment)
    pub researchgate: Option<String>,

    /// Research-area tags (enrichment), at most [`MAX_RESEARCH_AREAS`]
    #[serde(default)]
    pub research_areas: Vec<String>,
}

impl ResearcherRecord {
    /// Create a record with only the name set
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
            orcid: None,
            institution: None,
            website: None,
            linkedin: None,
            google_scholar: None,
            researchgate: None,
            research_areas: Vec::new(),
        }
    }
}
