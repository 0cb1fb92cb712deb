//! Profile enrichment via the language-model assistant.
//!
//! Each researcher is enriched independently: a failed assistant call or an
//! unparseable reply affects that record only and the batch always runs to
//! completion. Without a configured assistant the roster passes through
//! untouched.

use std::sync::Arc;
use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::llm::Assistant;
use crate::models::researcher::MAX_RESEARCH_AREAS;
use crate::models::ResearcherRecord;

/// Characters of page text included as paper context in the prompt
const EXCERPT_CHARS: usize = 500;

const ENRICH_SYSTEM_PROMPT: &str = "You suggest likely professional profiles for academic \
researchers. Reply with exactly one JSON object with keys \"linkedin\", \"google_scholar\" and \
\"researchgate\" (each a URL or null) and \"research_areas\" (an array of short topic strings). \
No markdown, no commentary.";

/// Fields the assistant may supply for one researcher
#[derive(Debug, Deserialize)]
struct ProfileHints {
    linkedin: Option<String>,
    google_scholar: Option<String>,
    researchgate: Option<String>,
    research_areas: Option<Vec<String>>,
}

fn linkedin_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:https?://)?(?:www\.)?linkedin\.com/in/[A-Za-z0-9._-]+")
            .expect("valid linkedin regex")
    })
}

/// Enriches researcher records with profile guesses
#[derive(Debug, Clone)]
pub struct ProfileEnricher {
    assistant: Option<Arc<dyn Assistant>>,
}

impl ProfileEnricher {
    /// Create an enricher; pass `None` to make enrichment a no-op
    pub fn new(assistant: Option<Arc<dyn Assistant>>) -> Self {
        Self { assistant }
    }

    /// Enrich every record in place, preserving extraction order.
    ///
    /// Populated fields are never reset: the assistant's value is taken
    /// only when present and non-null.
    pub async fn enrich(&self, roster: &mut [ResearcherRecord], paper_title: &str, text: &str) {
        let Some(assistant) = &self.assistant else {
            return;
        };

        let excerpt: String = text.chars().take(EXCERPT_CHARS).collect();

        for record in roster.iter_mut() {
            let prompt = format!(
                "Researcher: {}\nInstitution: {}\nPaper: {}\nPaper excerpt:\n{}",
                record.name,
                record.institution.as_deref().unwrap_or("Unknown"),
                paper_title,
                excerpt
            );

            match assistant.complete(ENRICH_SYSTEM_PROMPT, &prompt, 300, 0.2).await {
                Ok(reply) => apply_reply(record, &reply),
                Err(e) => {
                    tracing::warn!("Enrichment failed for {}: {}", record.name, e);
                }
            }
        }
    }
}

/// Apply one assistant reply to one record.
///
/// Strict JSON parse first; on failure a single narrow recovery runs, a
/// LinkedIn-profile substring, and everything else stays as it was.
fn apply_reply(record: &mut ResearcherRecord, reply: &str) {
    match serde_json::from_str::<ProfileHints>(reply.trim()) {
        Ok(hints) => {
            if let Some(linkedin) = hints.linkedin {
                record.linkedin = Some(linkedin);
            }
            if let Some(google_scholar) = hints.google_scholar {
                record.google_scholar = Some(google_scholar);
            }
            if let Some(researchgate) = hints.researchgate {
                record.researchgate = Some(researchgate);
            }
            if let Some(mut areas) = hints.research_areas {
                areas.truncate(MAX_RESEARCH_AREAS);
                record.research_areas = areas;
            }
        }
        Err(e) => {
            tracing::debug!("Assistant reply was not valid JSON ({}), trying recovery", e);
            if let Some(m) = linkedin_re().find(reply) {
                record.linkedin = Some(m.as_str().to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock::MockAssistant;
    use crate::llm::AssistantError;

    fn roster_of(names: &[&str]) -> Vec<ResearcherRecord> {
        names.iter().map(|n| ResearcherRecord::new(*n)).collect()
    }

    #[tokio::test]
    async fn test_no_assistant_leaves_roster_unchanged() {
        let enricher = ProfileEnricher::new(None);
        let mut roster = roster_of(&["Alice Chen"]);
        let before = roster.clone();
        enricher.enrich(&mut roster, "Some Paper", "text").await;
        assert_eq!(roster, before);
    }

    #[tokio::test]
    async fn test_full_reply_populates_fields() {
        let reply = r#"{
            "linkedin": "https://www.linkedin.com/in/alice-chen",
            "google_scholar": "https://scholar.google.com/citations?user=abc",
            "researchgate": null,
            "research_areas": ["ml", "nlp", "vision", "speech", "robotics", "theory", "hci"]
        }"#;
        let assistant = Arc::new(MockAssistant::with_replies(vec![Ok(reply.to_string())]));
        let enricher = ProfileEnricher::new(Some(assistant));

        let mut roster = roster_of(&["Alice Chen"]);
        roster[0].researchgate = Some("https://www.researchgate.net/profile/existing".to_string());
        enricher.enrich(&mut roster, "Some Paper", "text").await;

        assert_eq!(
            roster[0].linkedin.as_deref(),
            Some("https://www.linkedin.com/in/alice-chen")
        );
        assert_eq!(
            roster[0].google_scholar.as_deref(),
            Some("https://scholar.google.com/citations?user=abc")
        );
        // Null from the assistant never clears a populated field
        assert_eq!(
            roster[0].researchgate.as_deref(),
            Some("https://www.researchgate.net/profile/existing")
        );
        // Tag list is capped
        assert_eq!(roster[0].research_areas.len(), MAX_RESEARCH_AREAS);
        assert_eq!(roster[0].research_areas[0], "ml");
    }

    #[tokio::test]
    async fn test_unparseable_reply_recovers_linkedin_only() {
        let reply = "Sure! You can find her at linkedin.com/in/alice-chen and she works on ML.";
        let assistant = Arc::new(MockAssistant::with_replies(vec![Ok(reply.to_string())]));
        let enricher = ProfileEnricher::new(Some(assistant));

        let mut roster = roster_of(&["Alice Chen"]);
        enricher.enrich(&mut roster, "Some Paper", "text").await;

        assert_eq!(
            roster[0].linkedin.as_deref(),
            Some("linkedin.com/in/alice-chen")
        );
        assert!(roster[0].google_scholar.is_none());
        assert!(roster[0].researchgate.is_none());
        assert!(roster[0].research_areas.is_empty());
    }

    #[tokio::test]
    async fn test_unparseable_reply_without_linkedin_changes_nothing() {
        let assistant = Arc::new(MockAssistant::with_replies(vec![Ok(
            "I could not find anything.".to_string(),
        )]));
        let enricher = ProfileEnricher::new(Some(assistant));

        let mut roster = roster_of(&["Alice Chen"]);
        let before = roster.clone();
        enricher.enrich(&mut roster, "Some Paper", "text").await;
        assert_eq!(roster, before);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_affect_the_batch() {
        let good = r#"{"linkedin": "https://www.linkedin.com/in/x", "google_scholar": null,
                       "researchgate": null, "research_areas": ["ml"]}"#;
        let assistant = Arc::new(MockAssistant::with_replies(vec![
            Ok(good.to_string()),
            Err(AssistantError::Http("timeout".to_string())),
            Ok(good.to_string()),
        ]));
        let enricher = ProfileEnricher::new(Some(assistant));

        let mut roster = roster_of(&["Alice Chen", "Bob Kumar", "Carol Jones"]);
        enricher.enrich(&mut roster, "Some Paper", "text").await;

        assert_eq!(roster.len(), 3);
        assert!(roster[0].linkedin.is_some());
        assert!(roster[1].linkedin.is_none());
        assert!(roster[2].linkedin.is_some());
        // Order still matches extraction order
        let names: Vec<&str> = roster.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice Chen", "Bob Kumar", "Carol Jones"]);
    }

    #[tokio::test]
    async fn test_prompt_carries_context_and_excerpt_cap() {
        let assistant = Arc::new(MockAssistant::with_replies(vec![Ok("{}".to_string())]));
        let enricher = ProfileEnricher::new(Some(Arc::clone(&assistant) as Arc<dyn Assistant>));

        let mut roster = roster_of(&["Alice Chen"]);
        let long_text = "x".repeat(2000);
        enricher.enrich(&mut roster, "A Long Study", &long_text).await;

        let prompts = assistant.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Alice Chen"));
        assert!(prompts[0].contains("Institution: Unknown"));
        assert!(prompts[0].contains("A Long Study"));
        // Excerpt is capped at 500 characters
        assert!(!prompts[0].contains(&"x".repeat(501)));
        assert!(prompts[0].contains(&"x".repeat(500)));
    }
}
