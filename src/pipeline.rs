//! Request-scoped pipelines tying the components together.
//!
//! One pipeline per surface operation, each run to completion within its
//! request; nothing is shared mutably across requests.

use serde::{Deserialize, Serialize};

use crate::enrich::ProfileEnricher;
use crate::extract::extract_researchers;
use crate::models::{PaperRecord, ResearcherRecord, SearchRequirement, SortBy, SortOrder};
use crate::pdf::{fetch_first_page_text, PdfError};
use crate::query::{and_author, and_submission_window, QuerySynthesizer};
use crate::sources::{ArxivClient, SourceError};
use crate::utils::HttpClient;

/// Result of one search request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// The full expression sent to arXiv, window clause included
    pub expression: String,

    /// Matched papers, newest first
    pub papers: Vec<PaperRecord>,
}

/// Result of one contact-extraction request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactReport {
    /// The PDF URL that was processed
    pub url: String,

    /// Paper title: the caller's hint, else the first line of the page
    pub paper_title: String,

    /// Extracted (and possibly enriched) researcher roster
    pub researchers: Vec<ResearcherRecord>,
}

/// Requirement text to paper list
#[derive(Debug, Clone)]
pub struct SearchPipeline {
    synthesizer: QuerySynthesizer,
    arxiv: ArxivClient,
}

impl SearchPipeline {
    /// Assemble the search pipeline
    pub fn new(synthesizer: QuerySynthesizer, arxiv: ArxivClient) -> Self {
        Self { synthesizer, arxiv }
    }

    /// Synthesize the query, apply the submission-date window, and search.
    pub async fn run(&self, request: &SearchRequirement) -> Result<SearchOutcome, SourceError> {
        request
            .validate()
            .map_err(|e| SourceError::InvalidRequest(e.to_string()))?;

        let mut expression = self.synthesizer.synthesize(&request.requirement).await;
        if let Some(author) = &request.author {
            expression = and_author(&expression, author);
        }
        let expression = and_submission_window(&expression, request.days_back);

        let papers = self
            .arxiv
            .search(
                &expression,
                0,
                request.max_results,
                SortBy::SubmittedDate,
                SortOrder::Descending,
            )
            .await?;

        tracing::info!("Search returned {} papers", papers.len());
        Ok(SearchOutcome { expression, papers })
    }
}

/// PDF URL to researcher roster
#[derive(Debug, Clone)]
pub struct ContactPipeline {
    client: HttpClient,
    enricher: ProfileEnricher,
}

impl ContactPipeline {
    /// Assemble the contact pipeline
    pub fn new(client: HttpClient, enricher: ProfileEnricher) -> Self {
        Self { client, enricher }
    }

    /// Fetch the PDF, extract the roster from page one, enrich it.
    ///
    /// Fails only when the page text itself cannot be produced; an empty
    /// roster from unpromising text is a success.
    pub async fn run(
        &self,
        pdf_url: &str,
        title_hint: Option<&str>,
    ) -> Result<ContactReport, PdfError> {
        let text = fetch_first_page_text(&self.client, pdf_url).await?;

        let mut researchers = extract_researchers(&text);
        tracing::info!(
            "Extracted {} researchers from {}",
            researchers.len(),
            pdf_url
        );

        let paper_title = derive_title(title_hint, &text);
        self.enricher
            .enrich(&mut researchers, &paper_title, &text)
            .await;

        Ok(ContactReport {
            url: pdf_url.to_string(),
            paper_title,
            researchers,
        })
    }
}

/// Title hint if given, else the first non-empty line of the page text.
fn derive_title(hint: Option<&str>, text: &str) -> String {
    if let Some(hint) = hint {
        let hint = hint.trim();
        if !hint.is_empty() {
            return hint.to_string();
        }
    }

    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_title_prefers_hint() {
        assert_eq!(
            derive_title(Some("Given Title"), "First Line\nmore"),
            "Given Title"
        );
    }

    #[test]
    fn test_derive_title_falls_back_to_first_line() {
        assert_eq!(
            derive_title(None, "\n  \nDeep Triage\nAlice Chen"),
            "Deep Triage"
        );
        assert_eq!(derive_title(Some("   "), "Deep Triage\n"), "Deep Triage");
    }

    #[test]
    fn test_derive_title_unknown_on_blank_text() {
        assert_eq!(derive_title(None, "  \n "), "Unknown");
    }
}
