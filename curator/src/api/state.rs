use std::sync::Arc;

use crate::config::Config;
use crate::db::DatabaseBackend;
use crate::services::ChatLogService;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Arc<dyn DatabaseBackend>,
    pub chat_logs: ChatLogService,
}

impl AppState {
    pub fn new(config: Config, db: Arc<dyn DatabaseBackend>) -> Self {
        let config = Arc::new(config);
        let chat_logs = ChatLogService::new(db.clone());

        Self {
            config,
            db,
            chat_logs,
        }
    }
}
