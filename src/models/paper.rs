//! Paper model for arXiv search results.

use serde::{Deserialize, Serialize};

/// Base URL for arXiv PDFs
const ARXIV_PDF_URL: &str = "https://arxiv.org/pdf";

/// A paper returned by the arXiv search API.
///
/// Records are created once per search-response entry and are read-only
/// afterwards; nothing is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaperRecord {
    /// arXiv identifier, the final path segment of the canonical link
    /// (e.g. "2301.12345v1")
    pub arxiv_id: String,

    /// Paper title, whitespace-normalized
    pub title: String,

    /// Author display names in the order the feed lists them
    pub authors: Vec<String>,

    /// Abstract text, whitespace-normalized
    pub summary: String,

    /// Publication date at date-only precision (YYYY-MM-DD)
    pub published: Option<String>,

    /// Canonical abstract-page link
    pub url: String,

    /// Direct PDF URL
    pub pdf_url: String,
}

impl PaperRecord {
    /// Derive the arXiv identifier from a canonical abstract link.
    ///
    /// Takes the final path segment, so re-deriving from a record's own
    /// `url` always yields the same identifier.
    pub fn id_from_link(link: &str) -> String {
        link.trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(link)
            .to_string()
    }

    /// Collapse embedded newlines and whitespace runs to single spaces.
    pub fn normalize_text(raw: &str) -> String {
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Truncate a feed timestamp to date-only precision (first 10 chars).
    pub fn date_only(timestamp: &str) -> String {
        timestamp.chars().take(10).collect()
    }
}

/// Builder for constructing [`PaperRecord`] objects from feed entries
#[derive(Debug, Clone)]
pub struct PaperBuilder {
    paper: PaperRecord,
}

impl PaperBuilder {
    /// Create a builder from the entry's canonical link; the identifier and
    /// PDF URL are derived from it.
    pub fn from_link(link: impl Into<String>) -> Self {
        let url = link.into();
        let arxiv_id = PaperRecord::id_from_link(&url);
        let pdf_url = format!("{}/{}", ARXIV_PDF_URL, arxiv_id);
        Self {
            paper: PaperRecord {
                arxiv_id,
                title: String::new(),
                authors: Vec::new(),
                summary: String::new(),
                published: None,
                url,
                pdf_url,
            },
        }
    }

    /// Set the title (normalized)
    pub fn title(mut self, title: &str) -> Self {
        self.paper.title = PaperRecord::normalize_text(title);
        self
    }

    /// Set the abstract (normalized)
    pub fn summary(mut self, summary: &str) -> Self {
        self.paper.summary = PaperRecord::normalize_text(summary);
        self
    }

    /// Set the publication timestamp, truncated to date-only precision
    pub fn published(mut self, timestamp: &str) -> Self {
        self.paper.published = Some(PaperRecord::date_only(timestamp));
        self
    }

    /// Add an author display name; empty names are skipped
    pub fn author(mut self, name: &str) -> Self {
        let name = name.trim();
        if !name.is_empty() {
            self.paper.authors.push(name.to_string());
        }
        self
    }

    /// Build the record
    pub fn build(self) -> PaperRecord {
        self.paper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_derives_id_and_pdf_url() {
        let paper = PaperBuilder::from_link("http://arxiv.org/abs/2301.12345v1")
            .title("Test Paper")
            .build();

        assert_eq!(paper.arxiv_id, "2301.12345v1");
        assert_eq!(paper.pdf_url, "https://arxiv.org/pdf/2301.12345v1");
    }

    #[test]
    fn test_id_round_trip_is_stable() {
        let paper = PaperBuilder::from_link("http://arxiv.org/abs/2301.12345v1").build();
        assert_eq!(PaperRecord::id_from_link(&paper.url), paper.arxiv_id);

        // Trailing slash does not change the derived id
        assert_eq!(
            PaperRecord::id_from_link("http://arxiv.org/abs/2301.12345v1/"),
            "2301.12345v1"
        );
    }

    #[test]
    fn test_normalize_collapses_newlines() {
        let title = "  Attention Is\n  All You Need ";
        assert_eq!(
            PaperRecord::normalize_text(title),
            "Attention Is All You Need"
        );
    }

    #[test]
    fn test_date_only_truncation() {
        assert_eq!(
            PaperRecord::date_only("2023-01-15T10:00:00Z"),
            "2023-01-15"
        );
        assert_eq!(PaperRecord::date_only("2023"), "2023");
    }

    #[test]
    fn test_empty_authors_skipped() {
        let paper = PaperBuilder::from_link("http://arxiv.org/abs/2301.12345")
            .author("Jane Doe")
            .author("   ")
            .author("John Smith")
            .build();

        assert_eq!(paper.authors, vec!["Jane Doe", "John Smith"]);
    }
}
