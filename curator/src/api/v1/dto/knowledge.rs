//! Knowledge-base request/response DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{self, EntrySource};

/// Provenance of a knowledge entry on the wire.
///
/// Wire format: `"manual"` or `"import"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum V1EntrySource {
    Manual,
    Import,
}

impl From<EntrySource> for V1EntrySource {
    fn from(source: EntrySource) -> Self {
        match source {
            EntrySource::Manual => V1EntrySource::Manual,
            EntrySource::Import => V1EntrySource::Import,
        }
    }
}

impl From<V1EntrySource> for EntrySource {
    fn from(source: V1EntrySource) -> Self {
        match source {
            V1EntrySource::Manual => EntrySource::Manual,
            V1EntrySource::Import => EntrySource::Import,
        }
    }
}

/// Request body for `POST /v1/kbs`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateKbRequest {
    pub name: String,
    /// Matching-model name. Falls back to the configured default.
    pub model: Option<String>,
}

/// Knowledge-base metadata, including the bound on the searchable field.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KbMetadataResponse {
    pub kb_id: String,
    pub name: String,
    pub model: String,
    /// Max length of the `q` field under this kb's matching model.
    pub max_token: usize,
}

impl From<models::KbMetadata> for KbMetadataResponse {
    fn from(meta: models::KbMetadata) -> Self {
        Self {
            kb_id: meta.kb_id,
            name: meta.name,
            model: meta.model,
            max_token: meta.max_token,
        }
    }
}

impl From<KbMetadataResponse> for models::KbMetadata {
    fn from(meta: KbMetadataResponse) -> Self {
        Self {
            kb_id: meta.kb_id,
            name: meta.name,
            model: meta.model,
            max_token: meta.max_token,
        }
    }
}

/// Request body for `POST /v1/kbs/{kbId}/entries`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    /// Searchable question text. Bounded by the kb's matching model.
    pub q: String,
    /// Supplementary answer text injected on match. Bounded at 3000 chars.
    #[serde(default)]
    pub a: String,
    /// Provenance tag. Defaults to `manual`.
    pub source: Option<V1EntrySource>,
}

/// Request body for `PATCH /v1/entries/{dataId}`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    /// Knowledge base the entry belongs to; resolves the `q` bound.
    pub kb_id: String,
    /// Replacement question text. Empty string means "no change".
    #[serde(default)]
    pub q: String,
    /// Replacement answer text, always applied.
    #[serde(default)]
    pub a: String,
}

/// Full knowledge-entry response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntryResponse {
    /// Store-assigned entry id (nanoid, 21 chars).
    pub data_id: String,
    pub kb_id: String,
    pub q: String,
    pub a: String,
    pub source: V1EntrySource,
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String)]
    pub updated_at: DateTime<Utc>,
}

impl From<models::KnowledgeEntry> for EntryResponse {
    fn from(entry: models::KnowledgeEntry) -> Self {
        Self {
            data_id: entry.id,
            kb_id: entry.kb_id,
            q: entry.q,
            a: entry.a,
            source: entry.source.into(),
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// Response body for `DELETE /v1/entries/{dataId}`.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEntryResponse {
    pub data_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_entry_request_defaults() {
        let json = r#"{ "q": "What is X?" }"#;
        let req: CreateEntryRequest = serde_json::from_str(json).expect("deserialize");
        assert_eq!(req.q, "What is X?");
        assert_eq!(req.a, "");
        assert!(req.source.is_none());
    }

    #[test]
    fn update_entry_request_empty_question_means_no_change() {
        let json = r#"{ "kbId": "kb1", "a": "new answer" }"#;
        let req: UpdateEntryRequest = serde_json::from_str(json).expect("deserialize");
        assert_eq!(req.kb_id, "kb1");
        assert_eq!(req.q, "");
        assert_eq!(req.a, "new answer");
    }

    #[test]
    fn entry_response_serializes_camel_case() {
        let entry = EntryResponse {
            data_id: "d1".to_string(),
            kb_id: "kb1".to_string(),
            q: "q".to_string(),
            a: "a".to_string(),
            source: V1EntrySource::Manual,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json["dataId"], "d1");
        assert_eq!(json["kbId"], "kb1");
        assert_eq!(json["source"], "manual");
    }
}
