use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::api::v1::dto::{EntryResponse, KbMetadataResponse};
use crate::error::{CuratorError, Result};
use crate::models::{EntrySource, KbMetadata};

/// Remote operations the entry editor drives. Implemented over HTTP for
/// production; tests substitute a recording mock.
#[async_trait]
pub trait KnowledgeClient: Send + Sync {
    async fn fetch_kb_metadata(&self, kb_id: &str) -> Result<KbMetadata>;

    async fn create_entry(
        &self,
        kb_id: &str,
        q: &str,
        a: &str,
        source: EntrySource,
    ) -> Result<EntryResponse>;

    /// Empty `q` signals "no change" to the store; `a` always replaces.
    async fn update_entry(&self, data_id: &str, kb_id: &str, q: &str, a: &str) -> Result<()>;

    async fn delete_entry(&self, data_id: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_token: String,
    pub timeout_secs: u64,
}

/// v1 response envelope as seen from the consumer side.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    error: Option<EnvelopeError>,
}

#[derive(Debug, Deserialize)]
struct EnvelopeError {
    code: String,
    message: String,
}

/// [`KnowledgeClient`] over the v1 HTTP API.
#[derive(Clone)]
pub struct HttpKnowledgeClient {
    client: Client,
    config: ClientConfig,
}

impl HttpKnowledgeClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CuratorError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn unwrap_envelope<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| CuratorError::RemoteApi(format!("Failed to parse response: {e}")))?;

        if let Some(error) = envelope.error {
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    CuratorError::ApiAuth(error.message)
                }
                StatusCode::NOT_FOUND => CuratorError::NotFound(error.message),
                StatusCode::BAD_REQUEST => CuratorError::Validation(error.message),
                _ => CuratorError::RemoteApi(format!("{} ({})", error.message, error.code)),
            });
        }

        envelope
            .data
            .ok_or_else(|| CuratorError::RemoteApi(format!("Empty response body ({status})")))
    }
}

#[async_trait]
impl KnowledgeClient for HttpKnowledgeClient {
    async fn fetch_kb_metadata(&self, kb_id: &str) -> Result<KbMetadata> {
        let response = self
            .client
            .get(self.url(&format!("/kbs/{kb_id}")))
            .bearer_auth(&self.config.api_token)
            .send()
            .await?;

        let meta: KbMetadataResponse = Self::unwrap_envelope(response).await?;
        Ok(meta.into())
    }

    async fn create_entry(
        &self,
        kb_id: &str,
        q: &str,
        a: &str,
        source: EntrySource,
    ) -> Result<EntryResponse> {
        let response = self
            .client
            .post(self.url(&format!("/kbs/{kb_id}/entries")))
            .bearer_auth(&self.config.api_token)
            .json(&json!({ "q": q, "a": a, "source": source }))
            .send()
            .await?;

        Self::unwrap_envelope(response).await
    }

    async fn update_entry(&self, data_id: &str, kb_id: &str, q: &str, a: &str) -> Result<()> {
        let response = self
            .client
            .patch(self.url(&format!("/entries/{data_id}")))
            .bearer_auth(&self.config.api_token)
            .json(&json!({ "kbId": kb_id, "q": q, "a": a }))
            .send()
            .await?;

        Self::unwrap_envelope::<EntryResponse>(response).await?;
        Ok(())
    }

    async fn delete_entry(&self, data_id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.url(&format!("/entries/{data_id}")))
            .bearer_auth(&self.config.api_token)
            .send()
            .await?;

        // The ack body only echoes the id; nothing in it is needed here.
        Self::unwrap_envelope::<serde_json::Value>(response).await?;
        Ok(())
    }
}
