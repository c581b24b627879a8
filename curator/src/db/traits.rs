use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    ChatLogRequest, ChatLogRow, ChatMessageItem, ChatSession, EntrySource, KnowledgeBase,
    KnowledgeEntry,
};

/// Read-side operations over chat sessions and their message items, plus the
/// write operations the external conversation subsystem uses to land data.
#[async_trait]
pub trait ChatLogStore: Send + Sync {
    async fn create_chat_session(&self, session: &ChatSession) -> Result<()>;
    async fn create_chat_message(&self, message: &ChatMessageItem) -> Result<()>;

    /// One page of sessions for `(app_id, user_id)`, ranked by derived
    /// feedback volume then recency.
    async fn list_chat_logs(&self, req: &ChatLogRequest) -> Result<Vec<ChatLogRow>>;

    /// Unsliced count over the same filter predicate as [`Self::list_chat_logs`].
    async fn count_chat_sessions(&self, app_id: &str, user_id: &str) -> Result<u64>;
}

/// CRUD operations for knowledge bases and their entries.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    async fn create_knowledge_base(&self, name: &str, model: &str) -> Result<KnowledgeBase>;
    async fn get_knowledge_base(&self, id: &str) -> Result<Option<KnowledgeBase>>;
    async fn create_entry(
        &self,
        kb_id: &str,
        q: &str,
        a: &str,
        source: EntrySource,
    ) -> Result<KnowledgeEntry>;
    async fn get_entry(&self, id: &str) -> Result<Option<KnowledgeEntry>>;

    /// Replace the answer; `q = None` leaves the stored question unchanged.
    /// Returns false when the entry does not exist.
    async fn update_entry(&self, id: &str, q: Option<&str>, a: &str) -> Result<bool>;
    async fn delete_entry(&self, id: &str) -> Result<bool>;
}

/// A complete database backend combining all store traits plus lifecycle
/// operations.
#[async_trait]
pub trait DatabaseBackend: ChatLogStore + KnowledgeStore {
    /// Sync with remote (e.g. Turso replication). No-op for local backends.
    async fn sync(&self) -> Result<()>;
}
