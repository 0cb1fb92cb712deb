//! arXiv search adapter.
//!
//! Issues a fielded boolean query against the arXiv export API and parses
//! the Atom response into [`PaperRecord`]s. Thin by design: query synthesis
//! happens upstream, contact extraction downstream.

use feed_rs::parser;

use crate::models::{PaperBuilder, PaperRecord, SortBy, SortOrder};
use crate::sources::SourceError;
use crate::utils::{api_retry_config, with_retry, HttpClient};

/// Base URL for the arXiv API
const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";
/// arXiv caps a single page of results at 200 entries
const ARXIV_MAX_RESULTS: usize = 200;

/// Client for the arXiv export API
#[derive(Debug, Clone)]
pub struct ArxivClient {
    client: HttpClient,
    api_url: String,
}

impl ArxivClient {
    /// Create a client against the public arXiv endpoint
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            api_url: ARXIV_API_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (for testing)
    pub fn with_api_url(client: HttpClient, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    /// Search arXiv with an already-synthesized boolean expression.
    ///
    /// `expression` must be in the arXiv field grammar (`ti:`, `au:`,
    /// `abs:`, `cat:`, `all:`, `submittedDate:` ranges, AND/OR grouping).
    pub async fn search(
        &self,
        expression: &str,
        start: usize,
        max_results: usize,
        sort_by: SortBy,
        sort_order: SortOrder,
    ) -> Result<Vec<PaperRecord>, SourceError> {
        if expression.trim().is_empty() {
            return Err(SourceError::InvalidRequest(
                "Empty search expression".to_string(),
            ));
        }

        let url = format!(
            "{}?search_query={}&start={}&max_results={}&sortBy={}&sortOrder={}",
            self.api_url,
            urlencoding::encode(expression),
            start,
            max_results.min(ARXIV_MAX_RESULTS),
            sort_by.as_str(),
            sort_order.as_str()
        );

        tracing::debug!("arXiv query: {}", url);

        let client = self.client.clone();
        let url_for_retry = url.clone();

        let feed = with_retry(api_retry_config(), || {
            let client = client.clone();
            let url = url_for_retry.clone();
            async move {
                let response = client
                    .get(&url)
                    .header("Accept", "application/atom+xml")
                    .send()
                    .await
                    .map_err(|e| {
                        SourceError::Network(format!("Failed to fetch arXiv results: {}", e))
                    })?;

                if !response.status().is_success() {
                    return Err(SourceError::Api(format!(
                        "arXiv API returned status: {}",
                        response.status()
                    )));
                }

                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))?;

                parser::parse(bytes.as_ref())
                    .map_err(|e| SourceError::Parse(format!("Failed to parse Atom feed: {}", e)))
            }
        })
        .await?;

        feed.entries.iter().map(Self::parse_entry).collect()
    }

    /// Map one Atom entry to a [`PaperRecord`]
    fn parse_entry(entry: &feed_rs::model::Entry) -> Result<PaperRecord, SourceError> {
        if entry.id.is_empty() {
            return Err(SourceError::Parse("Entry is missing its id link".to_string()));
        }

        let mut builder = PaperBuilder::from_link(&entry.id);

        if let Some(title) = &entry.title {
            builder = builder.title(&title.content);
        }
        if let Some(summary) = &entry.summary {
            builder = builder.summary(&summary.content);
        }
        if let Some(published) = entry.published {
            builder = builder.published(&published.to_rfc3339());
        }
        for author in &entry.authors {
            builder = builder.author(&author.name);
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
    <title>ArXiv Query Results</title>
    <entry>
        <id>http://arxiv.org/abs/2301.12345v1</id>
        <title>Deep Learning for
  Clinical Triage</title>
        <summary>We study triage
  models.</summary>
        <published>2023-01-15T10:00:00Z</published>
        <author><name>Alice Chen</name></author>
        <author><name>Bob Kumar</name></author>
        <link rel="alternate" type="text/html" href="http://arxiv.org/abs/2301.12345v1"/>
    </entry>
</feed>"#;

    #[test]
    fn test_parse_entry_from_mock_feed() {
        let feed = parser::parse(MOCK_FEED.as_bytes()).unwrap();
        assert_eq!(feed.entries.len(), 1);

        let paper = ArxivClient::parse_entry(&feed.entries[0]).unwrap();
        assert_eq!(paper.arxiv_id, "2301.12345v1");
        assert_eq!(paper.title, "Deep Learning for Clinical Triage");
        assert_eq!(paper.summary, "We study triage models.");
        assert_eq!(paper.published.as_deref(), Some("2023-01-15"));
        assert_eq!(paper.authors, vec!["Alice Chen", "Bob Kumar"]);
        assert_eq!(paper.url, "http://arxiv.org/abs/2301.12345v1");
        assert_eq!(paper.pdf_url, "https://arxiv.org/pdf/2301.12345v1");
    }

    #[tokio::test]
    async fn test_search_rejects_empty_expression() {
        let client = ArxivClient::new(HttpClient::new());
        let result = client
            .search("  ", 0, 10, SortBy::Relevance, SortOrder::Descending)
            .await;
        assert!(matches!(result, Err(SourceError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_search_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/atom+xml")
            .with_body(MOCK_FEED)
            .create_async()
            .await;

        let client = ArxivClient::with_api_url(HttpClient::new(), server.url());
        let papers = client
            .search(
                "cat:cs.LG",
                0,
                10,
                SortBy::SubmittedDate,
                SortOrder::Descending,
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(papers.len(), 1);
        assert_eq!(papers[0].arxiv_id, "2301.12345v1");
    }

    #[tokio::test]
    async fn test_search_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(400)
            .with_body("bad request")
            .create_async()
            .await;

        let client = ArxivClient::with_api_url(HttpClient::new(), server.url());
        let result = client
            .search("cat:cs.LG", 0, 10, SortBy::Relevance, SortOrder::Descending)
            .await;
        assert!(matches!(result, Err(SourceError::Api(_))));
    }
}
