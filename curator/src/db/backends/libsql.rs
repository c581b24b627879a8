use async_trait::async_trait;

use crate::db::connection::Database;
use crate::db::repository::{
    ChatLogRepository, KnowledgeBaseRepository, KnowledgeEntryRepository,
};
use crate::db::traits::{ChatLogStore, DatabaseBackend, KnowledgeStore};
use crate::error::Result;
use crate::models::{
    ChatLogRequest, ChatLogRow, ChatMessageItem, ChatSession, EntrySource, KnowledgeBase,
    KnowledgeEntry,
};

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ChatLogStore for LibSqlBackend {
    async fn create_chat_session(&self, session: &ChatSession) -> Result<()> {
        let conn = self.db.connect()?;
        ChatLogRepository::create_session(&conn, session).await
    }
    async fn create_chat_message(&self, message: &ChatMessageItem) -> Result<()> {
        let conn = self.db.connect()?;
        ChatLogRepository::create_message(&conn, message).await
    }
    async fn list_chat_logs(&self, req: &ChatLogRequest) -> Result<Vec<ChatLogRow>> {
        let conn = self.db.connect()?;
        ChatLogRepository::list(&conn, req).await
    }
    async fn count_chat_sessions(&self, app_id: &str, user_id: &str) -> Result<u64> {
        let conn = self.db.connect()?;
        ChatLogRepository::count(&conn, app_id, user_id).await
    }
}

#[async_trait]
impl KnowledgeStore for LibSqlBackend {
    async fn create_knowledge_base(&self, name: &str, model: &str) -> Result<KnowledgeBase> {
        let conn = self.db.connect()?;
        KnowledgeBaseRepository::create(&conn, name, model).await
    }
    async fn get_knowledge_base(&self, id: &str) -> Result<Option<KnowledgeBase>> {
        let conn = self.db.connect()?;
        KnowledgeBaseRepository::get_by_id(&conn, id).await
    }
    async fn create_entry(
        &self,
        kb_id: &str,
        q: &str,
        a: &str,
        source: EntrySource,
    ) -> Result<KnowledgeEntry> {
        let conn = self.db.connect()?;
        KnowledgeEntryRepository::create(&conn, kb_id, q, a, source).await
    }
    async fn get_entry(&self, id: &str) -> Result<Option<KnowledgeEntry>> {
        let conn = self.db.connect()?;
        KnowledgeEntryRepository::get_by_id(&conn, id).await
    }
    async fn update_entry(&self, id: &str, q: Option<&str>, a: &str) -> Result<bool> {
        let conn = self.db.connect()?;
        KnowledgeEntryRepository::update(&conn, id, q, a).await
    }
    async fn delete_entry(&self, id: &str) -> Result<bool> {
        let conn = self.db.connect()?;
        KnowledgeEntryRepository::delete(&conn, id).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn sync(&self) -> Result<()> {
        self.db.sync().await
    }
}
