//! Contact extraction from first-page PDF text.
//!
//! This is a positional heuristic, not an entity linker: emails, ORCID iDs
//! and institution lines are collected by independent passes and paired
//! with names by list index. The alignment is deliberately naive: record
//! i gets email i whether or not they belong together, and downstream
//! behavior depends on keeping it that way.

use std::sync::OnceLock;

use regex::Regex;

use crate::models::ResearcherRecord;

/// Cap on the number of researchers per roster
const MAX_RESEARCHERS: usize = 10;
/// Lines scanned for the author-section trigger and names
const AUTHOR_SCAN_LINES: usize = 25;
/// Leading lines where name patterns run regardless of the trigger
const UNCONDITIONAL_NAME_LINES: usize = 10;
/// Lines scanned for institution-keyword lines
const INSTITUTION_SCAN_LINES: usize = 30;
/// Institution lines must fall in this length range
const INSTITUTION_LEN: std::ops::RangeInclusive<usize> = 10..=200;

/// Words that flip the author-section flag
const AUTHOR_TRIGGERS: &[&str] = &["author", "affiliation", "department", "university", "institute"];

/// Words that mark a line as an institution line
const INSTITUTION_KEYWORDS: &[&str] = &[
    "university",
    "institute",
    "college",
    "laboratory",
    "center",
    "department",
];

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid email regex")
    })
}

fn orcid_re() -> &'static Regex {
    // The bare iD appears in every surface form (orcid.org/<id>, ORCID: <id>,
    // or standalone), so matching it alone covers all three.
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{4}-\d{4}-\d{4}-\d{3}[0-9X]").expect("valid orcid regex"))
}

fn url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"https?://[^\s<>"')\]]+"#).expect("valid url regex"))
}

fn name_res() -> &'static [Regex; 3] {
    static RES: OnceLock<[Regex; 3]> = OnceLock::new();
    RES.get_or_init(|| {
        [
            // First M. Last
            Regex::new(r"\b[A-Z][a-z]+\s+[A-Z]\.\s+[A-Z][a-z]+\b").expect("valid name regex"),
            // F. Last
            Regex::new(r"\b[A-Z]\.\s+[A-Z][a-z]+\b").expect("valid name regex"),
            // First Last
            Regex::new(r"\b[A-Z][a-z]+\s+[A-Z][a-z]+\b").expect("valid name regex"),
        ]
    })
}

/// Extract a best-effort researcher roster from first-page text.
///
/// Malformed or empty text yields an empty roster, never an error, and no
/// field is ever invented: everything unmatched stays `None`.
pub fn extract_researchers(text: &str) -> Vec<ResearcherRecord> {
    let emails = scan_all(email_re(), text);
    let orcids = scan_all(orcid_re(), text);
    let urls = scan_all(url_re(), text);

    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let names = scan_names(&lines);
    let institutions = scan_institutions(&lines);

    names
        .into_iter()
        .take(MAX_RESEARCHERS)
        .enumerate()
        .map(|(i, name)| {
            let website = find_website(&name, &urls);
            ResearcherRecord {
                email: emails.get(i).cloned(),
                orcid: orcids.get(i).cloned(),
                institution: institutions.get(i).cloned(),
                website,
                ..ResearcherRecord::new(name)
            }
        })
        .collect()
}

/// All matches of a pattern over the full text, in order
fn scan_all(re: &Regex, text: &str) -> Vec<String> {
    re.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

/// Collect candidate author names.
///
/// The first [`AUTHOR_SCAN_LINES`] lines are scanned; a line containing an
/// author-section trigger turns name matching on for the rest of the scan,
/// and the first [`UNCONDITIONAL_NAME_LINES`] lines are matched regardless.
/// Matches are kept distinct by exact string in first-seen order; strings
/// of three characters or fewer are dropped.
fn scan_names(lines: &[&str]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut in_author_section = false;

    for (i, line) in lines.iter().take(AUTHOR_SCAN_LINES).enumerate() {
        let lowered = line.to_lowercase();
        if AUTHOR_TRIGGERS.iter().any(|t| lowered.contains(t)) {
            in_author_section = true;
        }

        if !in_author_section && i >= UNCONDITIONAL_NAME_LINES {
            continue;
        }

        for re in name_res() {
            for m in re.find_iter(line) {
                let candidate = m.as_str();
                if candidate.len() <= 3 {
                    continue;
                }
                if !names.iter().any(|n| n == candidate) {
                    names.push(candidate.to_string());
                }
            }
        }
    }

    names
}

/// Collect institution-looking lines from the first
/// [`INSTITUTION_SCAN_LINES`] lines; duplicates are allowed.
fn scan_institutions(lines: &[&str]) -> Vec<String> {
    lines
        .iter()
        .take(INSTITUTION_SCAN_LINES)
        .filter(|line| INSTITUTION_LEN.contains(&line.len()))
        .filter(|line| {
            let lowered = line.to_lowercase();
            INSTITUTION_KEYWORDS.iter().any(|k| lowered.contains(k))
        })
        .map(|line| line.to_string())
        .collect()
}

/// First URL containing any name token longer than two characters.
///
/// Independent per researcher, so the same URL may be assigned twice.
fn find_website(name: &str, urls: &[String]) -> Option<String> {
    let tokens: Vec<String> = name
        .split_whitespace()
        .filter(|t| t.len() > 2)
        .map(str::to_lowercase)
        .collect();

    urls.iter()
        .find(|url| {
            let lowered = url.to_lowercase();
            tokens.iter().any(|t| lowered.contains(t.as_str()))
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_yields_empty_roster() {
        assert!(extract_researchers("").is_empty());
        assert!(extract_researchers("   \n \n\t").is_empty());
    }

    #[test]
    fn test_single_record_alignment_outside_any_trigger() {
        // One email, one ORCID, one name-shaped line, no trigger words:
        // the first ten lines are matched unconditionally, so a single
        // fully-populated record comes out.
        let text = "Alice Chen\nalice@example.org\n0000-0002-1825-0097\n";
        let roster = extract_researchers(text);

        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "Alice Chen");
        assert_eq!(roster[0].email.as_deref(), Some("alice@example.org"));
        assert_eq!(roster[0].orcid.as_deref(), Some("0000-0002-1825-0097"));
    }

    #[test]
    fn test_orcid_prefixes_are_optional() {
        let via_url = extract_researchers("Alice Chen\nhttps://orcid.org/0000-0002-1825-0097\n");
        assert_eq!(via_url[0].orcid.as_deref(), Some("0000-0002-1825-0097"));

        let via_label = extract_researchers("Alice Chen\nORCID: 0000-0002-1825-009X\n");
        assert_eq!(via_label[0].orcid.as_deref(), Some("0000-0002-1825-009X"));
    }

    #[test]
    fn test_positional_alignment_is_index_based() {
        let text = "\
Alice Chen, Bob Kumar
alice@a.edu bob@b.edu
DEPARTMENT OF COMPUTER SCIENCE, EXAMPLE UNIVERSITY
SCHOOL OF COMPUTING, ANOTHER UNIVERSITY
";
        let roster = extract_researchers(text);
        assert_eq!(roster.len(), 2);

        // Record 0 gets list slot 0, record 1 gets slot 1, right or wrong.
        assert_eq!(roster[0].email.as_deref(), Some("alice@a.edu"));
        assert_eq!(roster[1].email.as_deref(), Some("bob@b.edu"));
        assert_eq!(
            roster[0].institution.as_deref(),
            Some("DEPARTMENT OF COMPUTER SCIENCE, EXAMPLE UNIVERSITY")
        );
        assert_eq!(
            roster[1].institution.as_deref(),
            Some("SCHOOL OF COMPUTING, ANOTHER UNIVERSITY")
        );
    }

    #[test]
    fn test_missing_list_entries_stay_none() {
        let text = "Alice Chen and Bob Kumar\nalice@a.edu\n";
        let roster = extract_researchers(text);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].email.as_deref(), Some("alice@a.edu"));
        assert!(roster[1].email.is_none());
        assert!(roster[1].orcid.is_none());
        assert!(roster[1].institution.is_none());
    }

    #[test]
    fn test_trigger_extends_name_scan_past_line_ten() {
        let mut lines: Vec<String> = (0..12).map(|i| format!("filler line {}", i)).collect();
        lines.push("Authors".to_string());
        lines.push("Carol Jones".to_string());
        let roster = extract_researchers(&lines.join("\n"));

        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].name, "Carol Jones");
    }

    #[test]
    fn test_names_past_line_ten_need_a_trigger() {
        let mut lines: Vec<String> = (0..12).map(|i| format!("filler line {}", i)).collect();
        lines.push("Carol Jones".to_string());
        assert!(extract_researchers(&lines.join("\n")).is_empty());
    }

    #[test]
    fn test_duplicate_names_kept_once_in_first_seen_order() {
        let text = "Alice Chen\nBob Kumar\nAlice Chen\n";
        let roster = extract_researchers(text);
        let names: Vec<&str> = roster.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Alice Chen", "Bob Kumar"]);
    }

    #[test]
    fn test_roster_is_capped_at_ten() {
        let names = [
            "Alice Chen",
            "Bob Kumar",
            "Carol Jones",
            "David Park",
            "Emma Stone",
            "Frank Lloyd",
            "Grace Kim",
            "Henry Ford",
            "Irene Adler",
            "James Watt",
            "Kate Bush",
            "Liam Page",
        ];
        let text = format!("Authors\n{}\n", names.join("\n"));
        assert_eq!(extract_researchers(&text).len(), 10);
    }

    #[test]
    fn test_institution_line_length_bounds() {
        // Too short (< 10 chars) and too long (> 200 chars) lines are
        // skipped even when they contain a keyword.
        let long = format!("University {}", "x".repeat(200));
        let text = format!("Alice Chen\ncollege\n{}\nExample University, Dept. of CS\n", long);
        let roster = extract_researchers(&text);
        assert_eq!(
            roster[0].institution.as_deref(),
            Some("Example University, Dept. of CS")
        );
    }

    #[test]
    fn test_website_matches_a_name_token() {
        let text = "Alice Chen\nhttps://example.org/papers\nhttps://chen.example.org/\n";
        let roster = extract_researchers(text);
        assert_eq!(
            roster[0].website.as_deref(),
            Some("https://chen.example.org/")
        );
    }

    #[test]
    fn test_website_tokens_shorter_than_three_chars_ignored() {
        // "J." is two characters; only "Smith" can match.
        let text = "J. Smith\nhttps://j.example.org/\nhttps://smith.example.org/\n";
        let roster = extract_researchers(text);
        assert_eq!(
            roster[0].website.as_deref(),
            Some("https://smith.example.org/")
        );
    }

    #[test]
    fn test_name_pattern_precedence_on_one_line() {
        // "First M. Last" runs before "F. Last", so the full form is
        // collected first; the embedded "M. Smith" still shows up as its
        // own entry afterwards. That over-collection is part of the
        // heuristic contract.
        let roster = extract_researchers("John M. Smith\n");
        let names: Vec<&str> = roster.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["John M. Smith", "M. Smith"]);
    }

    #[test]
    fn test_no_fields_invented() {
        let roster = extract_researchers("Alice Chen\n");
        assert_eq!(roster.len(), 1);
        let r = &roster[0];
        assert!(r.email.is_none());
        assert!(r.orcid.is_none());
        assert!(r.institution.is_none());
        assert!(r.website.is_none());
        assert!(r.linkedin.is_none());
        assert!(r.research_areas.is_empty());
    }
}
