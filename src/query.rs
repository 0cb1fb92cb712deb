//! Query synthesis: free-text research interest to arXiv search expression.
//!
//! When an assistant is configured it is asked to write the expression; any
//! failure there degrades to the deterministic rule engine below, so
//! synthesis itself can never fail and never returns an empty string.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};

use crate::llm::Assistant;

/// Ordered topic table; the first matching entry supplies the base clause.
const TOPIC_RULES: &[(&[&str], &str)] = &[
    (&["machine learning", "ml"], "cat:cs.LG OR cat:stat.ML"),
    (&["computer vision", "cv"], "cat:cs.CV"),
    (&["natural language", "nlp"], "cat:cs.CL"),
    (&["robotics"], "cat:cs.RO"),
    (&["quantum"], "cat:quant-ph"),
    (&["physics"], "cat:physics"),
    (&["mathematics", "math"], "cat:math"),
];

/// Modifier table; every matching entry is ORed into one refinement clause.
const MODIFIER_RULES: &[(&[&str], &str)] = &[
    (&["healthcare", "medical"], "abs:healthcare OR abs:medical"),
    (&["autonomous", "self-driving"], "abs:autonomous"),
    (&["deep learning"], r#"abs:"deep learning""#),
    (&["reinforcement learning"], r#"abs:"reinforcement learning""#),
];

const SYNTHESIS_SYSTEM_PROMPT: &str = "You translate research interests into arXiv API search \
expressions. The grammar has fields ti: (title), au: (author), abs: (abstract), cat: (category) \
and all:, combined with AND / OR and parenthesized grouping. Reply with the query string only, \
on a single line, with no explanation and no markdown.";

/// Converts a free-text requirement into an arXiv search expression
#[derive(Debug, Clone)]
pub struct QuerySynthesizer {
    assistant: Option<Arc<dyn Assistant>>,
}

impl QuerySynthesizer {
    /// Create a synthesizer; pass `None` to always use the rule engine
    pub fn new(assistant: Option<Arc<dyn Assistant>>) -> Self {
        Self { assistant }
    }

    /// Synthesize a search expression for the requirement.
    ///
    /// Never fails and never returns an empty string: assistant problems
    /// degrade to [`rule_based_expression`].
    pub async fn synthesize(&self, requirement: &str) -> String {
        if let Some(assistant) = &self.assistant {
            let user_prompt = format!(
                "Write an arXiv search expression for this research interest:\n{}",
                requirement.trim()
            );
            match assistant
                .complete(SYNTHESIS_SYSTEM_PROMPT, &user_prompt, 200, 0.1)
                .await
            {
                Ok(reply) => {
                    if let Some(expression) = sanitize_reply(&reply) {
                        tracing::debug!("Assistant query: {}", expression);
                        return expression;
                    }
                    tracing::warn!("Assistant returned an unusable query, using rule engine");
                }
                Err(e) => {
                    tracing::warn!("Assistant query synthesis failed ({}), using rule engine", e);
                }
            }
        }

        rule_based_expression(requirement)
    }
}

/// Deterministic keyword-to-category fallback.
///
/// Lower-cases the requirement, picks the first matching topic clause, then
/// ANDs in the OR of every matching modifier clause. No topic match yields
/// `all:<requirement>` verbatim.
pub fn rule_based_expression(requirement: &str) -> String {
    let requirement = requirement.trim();
    let lowered = requirement.to_lowercase();

    let base = TOPIC_RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| keyword_hit(&lowered, k)))
        .map(|(_, clause)| *clause);

    let Some(base) = base else {
        return format!("all:{}", requirement);
    };

    let modifiers: Vec<&str> = MODIFIER_RULES
        .iter()
        .filter(|(keywords, _)| keywords.iter().any(|k| keyword_hit(&lowered, k)))
        .map(|(_, clause)| *clause)
        .collect();

    if modifiers.is_empty() {
        base.to_string()
    } else {
        format!("({}) AND ({})", base, modifiers.join(" OR "))
    }
}

/// Keyword test against the lower-cased requirement.
///
/// Phrases (anything containing a space or hyphen) match as substrings;
/// single tokens must match a whole word, so "ml" does not fire on "html".
fn keyword_hit(lowered: &str, keyword: &str) -> bool {
    if keyword.chars().any(|c| !c.is_alphanumeric()) {
        lowered.contains(keyword)
    } else {
        lowered
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == keyword)
    }
}

/// Pull a usable single-line expression out of an assistant reply.
fn sanitize_reply(reply: &str) -> Option<String> {
    reply
        .lines()
        .map(str::trim)
        .filter(|l| !l.starts_with("```"))
        .map(|l| l.trim_matches('`').trim_matches('"').trim())
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

/// AND an author restriction onto an expression.
pub fn and_author(expression: &str, author: &str) -> String {
    format!("({}) AND au:\"{}\"", expression, author.trim())
}

/// AND the submission-date window onto an expression.
///
/// The window covers `days_back` calendar days up to today, inclusive
/// day-stamp bounds with no time-of-day granularity.
pub fn and_submission_window(expression: &str, days_back: i64) -> String {
    and_submission_window_ending(expression, days_back, Utc::now().date_naive())
}

fn and_submission_window_ending(expression: &str, days_back: i64, end: NaiveDate) -> String {
    let start = end - Duration::days(days_back);
    format!(
        "({}) AND submittedDate:[{}* TO {}*]",
        expression,
        start.format("%Y%m%d"),
        end.format("%Y%m%d")
    )
}
