mod chat_logs;
mod knowledge;

pub use chat_logs::ChatLogRepository;
pub use knowledge::{KnowledgeBaseRepository, KnowledgeEntryRepository};
