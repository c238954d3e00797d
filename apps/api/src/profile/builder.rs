//! Profile builder — assigns recognizer output to profile fields.
//!
//! Entity rules form an ordered chain, first match wins:
//! 1. PERSON while `name` is empty → `name` (first person wins, later ones ignored)
//! 2. ORG → append `{company, role: ""}` (every occurrence, duplicates kept)
//! 3. EMAIL → `contact` (overwritten on every match, last one wins)
//! 4. anything else → ignored
//!
//! Skills are matched token by token in reading order, original casing kept.
//! The summary is the first `SUMMARY_CHARS` characters of the text plus `"..."`.

use std::sync::Arc;

use crate::nlp::{EntityLabel, EntitySpan, Token};
use crate::profile::skills::SkillVocabulary;
use crate::profile::{Experience, Profile};

pub const SUMMARY_CHARS: usize = 200;
pub const SUMMARY_SUFFIX: &str = "...";

#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    vocabulary: Arc<SkillVocabulary>,
}

impl ProfileBuilder {
    pub fn new(vocabulary: Arc<SkillVocabulary>) -> Self {
        Self { vocabulary }
    }

    /// Builds a profile. Entities and tokens are consumed once, in the order given.
    pub fn build<E, T>(&self, text: &str, entities: E, tokens: T) -> Profile
    where
        E: IntoIterator<Item = EntitySpan>,
        T: IntoIterator<Item = Token>,
    {
        let mut profile = Profile::default();

        for entity in entities {
            assign_entity(&mut profile, entity);
        }

        profile.skills = tokens
            .into_iter()
            .filter(|token| self.vocabulary.matches(&token.text))
            .map(|token| token.text)
            .collect();

        profile.summary = summarize(text);
        profile
    }
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        Self::new(Arc::new(SkillVocabulary::default()))
    }
}

fn assign_entity(profile: &mut Profile, entity: EntitySpan) {
    match entity.label {
        EntityLabel::Person if profile.name.is_empty() => profile.name = entity.text,
        EntityLabel::Organization => profile.experience.push(Experience {
            company: entity.text,
            role: String::new(),
        }),
        EntityLabel::Email => profile.contact = entity.text,
        _ => {}
    }
}

/// Character-based prefix, so multi-byte text is never split mid-character.
fn summarize(text: &str) -> String {
    let mut summary: String = text.chars().take(SUMMARY_CHARS).collect();
    summary.push_str(SUMMARY_SUFFIX);
    summary
}
