//! # Knowledge Entry Editor
//!
//! A headless editor component for knowledge-base q/a entries. It holds the
//! form state for a single entry, validates field lengths against the kb's
//! matching-model bound, and drives the remote create/update/delete
//! operations through a [`KnowledgeClient`]. Every operation returns a vector
//! of [`EditorEvent`]s; that vector is the component's only output channel,
//! so a caller (CLI, TUI, web frontend) renders toasts and reacts to
//! lifecycle events however it likes.

mod client;

pub use client::{ClientConfig, HttpKnowledgeClient, KnowledgeClient};

use crate::api::v1::dto::EntryResponse;
use crate::error::Result;
use crate::models::{EntrySource, KbMetadata};

/// Fallback bound on `q` until kb metadata has been resolved.
pub const DEFAULT_MAX_TOKEN: usize = 512;

/// Fixed bound on the supplementary `a` field, in chars.
pub const ANSWER_MAX_LEN: usize = 3000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Warning,
    Error,
}

/// A user-facing notification emitted by the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub title: String,
}

/// Everything the editor reports back to its caller.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Toast(Toast),
    /// A new entry was created; carries the store-assigned id.
    Created(EntryResponse),
    /// The entry under edit was deleted.
    Deleted { data_id: String },
    /// The editor is done and should be dismissed.
    Closed,
}

impl EditorEvent {
    fn toast(level: ToastLevel, title: impl Into<String>) -> Self {
        Self::Toast(Toast {
            level,
            title: title.into(),
        })
    }
}

/// Initial field values. A non-empty `data_id` puts the editor in edit mode;
/// an empty one means a brand-new entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDefaults {
    pub data_id: String,
    pub q: String,
    pub a: String,
}

/// Form state machine for one knowledge entry: Idle -> Submitting -> Idle.
///
/// The `submitting` flag guards re-entrant submission; there is no queueing
/// and no cancellation, so a stalled remote call simply keeps the editor in
/// Submitting until it resolves.
pub struct KnowledgeEntryEditor<C> {
    client: C,
    kb_id: String,
    defaults: EntryDefaults,
    q: String,
    a: String,
    metadata: Option<KbMetadata>,
    submitting: bool,
}

impl<C: KnowledgeClient> KnowledgeEntryEditor<C> {
    pub fn new(client: C, kb_id: impl Into<String>, defaults: EntryDefaults) -> Self {
        let q = defaults.q.clone();
        let a = defaults.a.clone();
        Self {
            client,
            kb_id: kb_id.into(),
            defaults,
            q,
            a,
            metadata: None,
            submitting: false,
        }
    }

    pub fn is_edit(&self) -> bool {
        !self.defaults.data_id.is_empty()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn question(&self) -> &str {
        &self.q
    }

    pub fn answer(&self) -> &str {
        &self.a
    }

    pub fn set_question(&mut self, q: impl Into<String>) {
        self.q = q.into();
    }

    pub fn set_answer(&mut self, a: impl Into<String>) {
        self.a = a.into();
    }

    /// Bound on `q` under this kb's matching model. [`DEFAULT_MAX_TOKEN`]
    /// until [`Self::ensure_metadata`] has resolved the real value.
    pub fn max_token(&self) -> usize {
        self.metadata
            .as_ref()
            .map(|meta| meta.max_token)
            .unwrap_or(DEFAULT_MAX_TOKEN)
    }

    /// Resolves kb metadata for the `q` bound. A caller-supplied cached copy
    /// is used when it matches this editor's kb id; otherwise the client
    /// fetches it. Resolution happens at most once per editor.
    pub async fn ensure_metadata(&mut self, cached: Option<&KbMetadata>) -> Result<usize> {
        if let Some(ref meta) = self.metadata {
            if meta.kb_id == self.kb_id {
                return Ok(meta.max_token);
            }
        }

        let meta = match cached {
            Some(meta) if meta.kb_id == self.kb_id => meta.clone(),
            _ => self.client.fetch_kb_metadata(&self.kb_id).await?,
        };
        let max_token = meta.max_token;
        self.metadata = Some(meta);
        Ok(max_token)
    }

    /// Create or update, depending on mode. Returns immediately with no
    /// events while a previous submission is in flight.
    pub async fn submit(&mut self) -> Vec<EditorEvent> {
        if self.submitting {
            return Vec::new();
        }

        self.submitting = true;
        let events = if self.is_edit() {
            self.submit_update().await
        } else {
            self.submit_create().await
        };
        self.submitting = false;

        events
    }

    /// Delete the entry under edit. No-op in create mode.
    pub async fn delete(&mut self) -> Vec<EditorEvent> {
        if !self.is_edit() || self.submitting {
            return Vec::new();
        }

        self.submitting = true;
        let events = match self.client.delete_entry(&self.defaults.data_id).await {
            Ok(()) => vec![
                EditorEvent::Deleted {
                    data_id: self.defaults.data_id.clone(),
                },
                EditorEvent::Closed,
                EditorEvent::toast(ToastLevel::Success, "Entry deleted"),
            ],
            Err(e) => vec![EditorEvent::toast(
                ToastLevel::Warning,
                format!("Delete failed: {e}"),
            )],
        };
        self.submitting = false;

        events
    }

    fn validate_fields(&self) -> Option<EditorEvent> {
        if self.q.trim().is_empty() {
            return Some(EditorEvent::toast(ToastLevel::Warning, "Question is required"));
        }
        let max_token = self.max_token();
        if self.q.chars().count() >= max_token {
            return Some(EditorEvent::toast(
                ToastLevel::Warning,
                format!("Question must be shorter than {max_token} characters"),
            ));
        }
        if self.a.chars().count() > ANSWER_MAX_LEN {
            return Some(EditorEvent::toast(
                ToastLevel::Warning,
                format!("Answer cannot exceed {ANSWER_MAX_LEN} characters"),
            ));
        }
        None
    }

    async fn submit_create(&mut self) -> Vec<EditorEvent> {
        if let Some(rejection) = self.validate_fields() {
            return vec![rejection];
        }

        match self
            .client
            .create_entry(&self.kb_id, &self.q, &self.a, EntrySource::Manual)
            .await
        {
            Ok(entry) => {
                self.q.clear();
                self.a.clear();
                vec![
                    EditorEvent::toast(ToastLevel::Success, "Entry created"),
                    EditorEvent::Created(entry),
                ]
            }
            // Form state stays as typed so the operator can retry.
            Err(e) => vec![EditorEvent::toast(
                ToastLevel::Error,
                format!("Create failed: {e}"),
            )],
        }
    }

    async fn submit_update(&mut self) -> Vec<EditorEvent> {
        if self.q == self.defaults.q && self.a == self.defaults.a {
            // Nothing changed; no remote call.
            return vec![
                EditorEvent::toast(ToastLevel::Success, "Entry updated"),
                EditorEvent::Closed,
            ];
        }

        if let Some(rejection) = self.validate_fields() {
            return vec![rejection];
        }

        // An unchanged question is sent empty ("no change"), sparing the
        // store a re-index of the searchable field. The answer always goes
        // out as typed.
        let q_sent = if self.q == self.defaults.q {
            ""
        } else {
            self.q.as_str()
        };

        match self
            .client
            .update_entry(&self.defaults.data_id, &self.kb_id, q_sent, &self.a)
            .await
        {
            Ok(()) => vec![
                EditorEvent::toast(ToastLevel::Success, "Entry updated"),
                EditorEvent::Closed,
            ],
            // The editor stays open so the operator keeps their edits.
            Err(e) => vec![EditorEvent::toast(
                ToastLevel::Error,
                format!("Update failed: {e}"),
            )],
        }
    }
}
