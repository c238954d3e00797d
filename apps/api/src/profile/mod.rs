// Profile assembly: entity classification, skill matching, summary truncation.
// Pure and synchronous. Never fails once text, entities and tokens are in hand.

pub mod builder;
pub mod skills;

use serde::{Deserialize, Serialize};

pub use builder::ProfileBuilder;
pub use skills::SkillVocabulary;

/// One organization mention. `role` is kept for schema stability and is never populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub role: String,
}

/// The structured profile handed to the rendering layer.
/// Key names are part of the output contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub summary: String,
    pub experience: Vec<Experience>,
    pub skills: Vec<String>,
    pub contact: String,
}
