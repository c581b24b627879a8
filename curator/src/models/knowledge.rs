use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance of a knowledge entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// Entered by an operator through the editor.
    #[default]
    Manual,
    /// Bulk-imported from an external file.
    Import,
}

impl std::fmt::Display for EntrySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Import => write!(f, "import"),
        }
    }
}

impl std::str::FromStr for EntrySource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "manual" => Ok(Self::Manual),
            "import" => Ok(Self::Import),
            _ => Err(format!("Unknown entry source: {s}")),
        }
    }
}

/// A named collection of knowledge entries used for retrieval matching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeBase {
    pub id: String,
    pub name: String,
    /// Matching-model name; determines the bound on the `q` field.
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Knowledge-base metadata as consumed by callers that need the input bound.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KbMetadata {
    pub kb_id: String,
    pub name: String,
    pub model: String,
    /// Upper bound on the searchable `q` field, from the matching model.
    pub max_token: usize,
}

/// A question/answer pair used for retrieval-augmented generation.
///
/// `q` is the content that is matched/searched; `a` is supplementary content
/// injected on match, not searched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeEntry {
    /// Store-assigned id (nanoid). Empty string before creation.
    pub id: String,
    pub kb_id: String,
    pub q: String,
    pub a: String,
    pub source: EntrySource,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_source_round_trips() {
        for source in [EntrySource::Manual, EntrySource::Import] {
            let parsed: EntrySource = source.to_string().parse().expect("parse");
            assert_eq!(parsed, source);
        }
        assert!("scraped".parse::<EntrySource>().is_err());
    }

    #[test]
    fn entry_source_serializes_snake_case() {
        let json = serde_json::to_value(EntrySource::Manual).expect("serialize");
        assert_eq!(json, "manual");
    }
}
