//! Skill vocabulary — the lower-cased keyword set tokens are matched against.
//!
//! Matching is single-token and case-insensitive only. No stemming, no partial
//! matches, no multi-word phrases: "communication" matches the token
//! "Communication" but never "communications" or "team communication".

use std::collections::HashSet;

/// Keywords used when `SKILL_KEYWORDS` is not configured.
pub const DEFAULT_SKILL_KEYWORDS: &[&str] =
    &["python", "javascript", "sql", "communication", "leadership"];

/// Ordered, de-duplicated, lower-cased keyword set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillVocabulary {
    keywords: Vec<String>,
    lookup: HashSet<String>,
}

impl SkillVocabulary {
    /// Builds a vocabulary from arbitrary keywords. Entries are trimmed and
    /// lower-cased; blanks and repeats are dropped, first occurrence keeps its position.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered = Vec::new();
        let mut lookup = HashSet::new();
        for keyword in keywords {
            let keyword = keyword.as_ref().trim().to_lowercase();
            if keyword.is_empty() {
                continue;
            }
            if lookup.insert(keyword.clone()) {
                ordered.push(keyword);
            }
        }
        Self {
            keywords: ordered,
            lookup,
        }
    }

    /// Parses a comma-separated keyword list, e.g. `"rust, SQL,go"`.
    pub fn from_csv(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    /// True iff the lower-cased token is a vocabulary entry.
    pub fn matches(&self, token: &str) -> bool {
        self.lookup.contains(&token.to_lowercase())
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

impl Default for SkillVocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_SKILL_KEYWORDS.iter().copied())
    }
}
