//! Rule-based recognizer — regex + gazetteer heuristics, no model files.
//!
//! Entities (emitted in text order):
//! - EMAIL: every address matching `EMAIL_PATTERN`
//! - ORG: a run of capitalized words containing an organization keyword
//!   ("Acme Corp", "University of Toronto")
//! - PERSON: a run of 2–3 title-case words on one line with no organization,
//!   section-heading or job-title word ("Jane Doe")
//!
//! Tokens: email addresses stay whole, words keep internal joiners
//! (`node.js`, `o'neil`, `C++`, `C#`), every other symbol is its own token.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::nlp::{EntityLabel, EntityRecognizer, EntitySpan, RecognizerError, Token};

const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+";

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(EMAIL_PATTERN).unwrap());

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{EMAIL_PATTERN}|\w+(?:[-'.]\w+)*[+#]*|[^\w\s]")).unwrap()
});

/// Capitalized words on a single line, optionally bridged by `&`, `of`, `and`, `the`.
static CAPITALIZED_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][\w'-]*(?:[ \t]+(?:(?:&|of|and|the)[ \t]+)?[A-Z][\w'-]*)*").unwrap()
});

const ORG_KEYWORDS: &[&str] = &[
    "Inc", "Corp", "Corporation", "LLC", "LLP", "Ltd", "Limited", "GmbH", "PLC", "Co",
    "Company", "Group", "Labs", "Technologies", "Technology", "Systems", "Solutions",
    "Partners", "Consulting", "Bank", "University", "College", "Institute",
    "School", "Academy", "Foundation", "Agency", "Association", "Hospital",
];

const SECTION_WORDS: &[&str] = &[
    "Experience", "Education", "Skills", "Summary", "Profile", "Objective", "Projects",
    "Contact", "References", "Certifications", "Awards", "Languages", "Interests",
    "Work", "History", "Professional", "Technical", "Resume", "Curriculum", "Vitae",
];

const ROLE_WORDS: &[&str] = &[
    "Engineer", "Developer", "Manager", "Analyst", "Designer", "Intern", "Consultant",
    "Director", "Lead", "Senior", "Junior", "Software", "Scientist", "Architect",
    "Administrator", "Officer", "Specialist", "Assistant", "Head", "Principal",
];

const JOINERS: &[&str] = &["&", "of", "and", "the"];

/// In-process recognizer used when no remote NLP endpoint is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleRecognizer;

#[async_trait]
impl EntityRecognizer for RuleRecognizer {
    async fn entities(&self, text: &str) -> Result<Vec<EntitySpan>, RecognizerError> {
        Ok(recognize_entities(text))
    }

    async fn tokens(&self, text: &str) -> Result<Vec<Token>, RecognizerError> {
        Ok(tokenize(text))
    }

    fn backend(&self) -> &'static str {
        "rules"
    }
}

pub fn tokenize(text: &str) -> Vec<Token> {
    TOKEN_RE
        .find_iter(text)
        .map(|m| Token::new(m.as_str(), m.start()))
        .collect()
}

pub fn recognize_entities(text: &str) -> Vec<EntitySpan> {
    let mut spans: Vec<EntitySpan> = EMAIL_RE
        .find_iter(text)
        .map(|m| span(m.as_str(), EntityLabel::Email, m.start(), m.end()))
        .collect();

    for run in CAPITALIZED_RUN_RE.find_iter(text) {
        let overlaps_email = spans
            .iter()
            .any(|s| run.start() < s.end && s.start < run.end());
        if overlaps_email {
            continue;
        }
        if let Some(label) = classify_run(run.as_str()) {
            spans.push(span(run.as_str(), label, run.start(), run.end()));
        }
    }

    spans.sort_by_key(|s| s.start);
    spans
}

fn classify_run(run: &str) -> Option<EntityLabel> {
    let words: Vec<&str> = run.split_whitespace().collect();

    if words.iter().any(|w| ORG_KEYWORDS.contains(w)) {
        return Some(EntityLabel::Organization);
    }

    let is_person = (2..=3).contains(&words.len())
        && words.iter().all(|w| is_title_case(w))
        && !words
            .iter()
            .any(|w| JOINERS.contains(w) || SECTION_WORDS.contains(w) || ROLE_WORDS.contains(w));

    is_person.then_some(EntityLabel::Person)
}

/// "Jane", "O'Neil", "McDonald" qualify; "SQL" and "J" do not.
fn is_title_case(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => chars.any(|c| c.is_lowercase()),
        _ => false,
    }
}

fn span(text: &str, label: EntityLabel, start: usize, end: usize) -> EntitySpan {
    EntitySpan {
        text: text.to_string(),
        label,
        start,
        end,
    }
}
