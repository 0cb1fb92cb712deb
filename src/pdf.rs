//! PDF fetching and first-page text extraction.
//!
//! Downloaded bytes live in a [`tempfile::NamedTempFile`] so they are
//! cleaned up on every exit path. Extraction is page-aware through lopdf,
//! with pdf-extract as a fallback when lopdf parses the document but finds
//! no text on page one.

use std::io::Write;
use std::path::Path;

use lopdf::Document;
use thiserror::Error;

use crate::utils::HttpClient;

/// Errors that can occur while fetching or reading a PDF
#[derive(Debug, Error)]
pub enum PdfError {
    /// The URL failed up-front validation
    #[error("Invalid PDF URL: {0}")]
    InvalidUrl(String),

    /// The resource could not be downloaded
    #[error("Failed to fetch PDF: {0}")]
    Fetch(String),

    /// The file is not a parseable PDF
    #[error("Failed to parse PDF: {0}")]
    Pdf(String),

    /// The document has no pages
    #[error("PDF has no pages")]
    NoPages,

    /// No text could be extracted from the first page
    #[error("Could not extract text from PDF")]
    NoText,

    /// IO error (temp file handling)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Validate a PDF URL before any network call.
///
/// Accepts http(s) URLs whose path ends in `.pdf` (case-insensitive).
pub fn validate_pdf_url(raw: &str) -> Result<url::Url, PdfError> {
    let parsed =
        url::Url::parse(raw.trim()).map_err(|e| PdfError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(PdfError::InvalidUrl(format!(
                "unsupported scheme: {}",
                other
            )))
        }
    }

    if !parsed.path().to_lowercase().ends_with(".pdf") {
        return Err(PdfError::InvalidUrl(
            "path does not end in a recognized document extension".to_string(),
        ));
    }

    Ok(parsed)
}

/// Download a PDF and return its first-page plain text.
///
/// The URL is validated first; bytes are spooled into a temp file that is
/// removed when this function returns, success or not.
pub async fn fetch_first_page_text(client: &HttpClient, url: &str) -> Result<String, PdfError> {
    let validated = validate_pdf_url(url)?;

    let response = client
        .get(validated.as_str())
        .send()
        .await
        .map_err(|e| PdfError::Fetch(e.to_string()))?;

    if !response.status().is_success() {
        return Err(PdfError::Fetch(format!(
            "server returned status {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| PdfError::Fetch(e.to_string()))?;

    let mut temp = tempfile::NamedTempFile::new()?;
    temp.write_all(&bytes)?;
    temp.flush()?;

    first_page_text(temp.path())
}

/// Extract plain text from page one of a PDF on disk.
pub fn first_page_text(path: &Path) -> Result<String, PdfError> {
    let doc = Document::load(path).map_err(|e| PdfError::Pdf(e.to_string()))?;

    if doc.get_pages().is_empty() {
        return Err(PdfError::NoPages);
    }

    let text = doc.extract_text(&[1]).unwrap_or_default();
    if !text.trim().is_empty() {
        return Ok(text);
    }

    // lopdf parsed the document but produced nothing; pdf-extract handles
    // some encodings lopdf does not. Pages are form-feed separated.
    match pdf_extract::extract_text(path) {
        Ok(full) => {
            let first = full.split('\u{000C}').next().unwrap_or("");
            if first.trim().is_empty() {
                Err(PdfError::NoText)
            } else {
                Ok(first.to_string())
            }
        }
        Err(e) => {
            tracing::debug!("pdf-extract fallback failed: {}", e);
            Err(PdfError::NoText)
        }
    }
}
