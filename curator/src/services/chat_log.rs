use std::sync::{Arc, OnceLock};

use regex::Regex;

use crate::db::DatabaseBackend;
use crate::error::{CuratorError, Result};
use crate::models::{ChatLogPage, ChatLogRequest};

/// Clamp bound on page size, matching the list-endpoint convention elsewhere.
const MAX_PAGE_SIZE: u32 = 100;

fn app_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("valid pattern"))
}

/// Ranked, paginated chat-log queries for one authenticated caller.
///
/// Read-only: sessions and messages are owned by the external conversation
/// subsystem.
#[derive(Clone)]
pub struct ChatLogService {
    db: Arc<dyn DatabaseBackend>,
}

impl ChatLogService {
    pub fn new(db: Arc<dyn DatabaseBackend>) -> Self {
        Self { db }
    }

    /// One page of sessions for `(app_id, user_id)`, ranked by feedback
    /// volume then recency, plus the unsliced total.
    ///
    /// The page query and the total count share one filter predicate and run
    /// concurrently; the first failure short-circuits the whole operation.
    pub async fn query(
        &self,
        user_id: &str,
        app_id: &str,
        page_num: u32,
        page_size: u32,
    ) -> Result<ChatLogPage> {
        if !app_id_pattern().is_match(app_id) {
            return Err(CuratorError::Validation(format!(
                "Malformed app id: {app_id}"
            )));
        }

        let req = ChatLogRequest {
            app_id: app_id.to_string(),
            user_id: user_id.to_string(),
            page_num: page_num.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        };

        let (data, total) = tokio::try_join!(
            self.db.list_chat_logs(&req),
            self.db.count_chat_sessions(&req.app_id, &req.user_id),
        )?;

        Ok(ChatLogPage {
            page_num: req.page_num,
            page_size: req.page_size,
            data,
            total,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::db::{Database, LibSqlBackend};
    use crate::models::ChatSession;
    use chrono::{TimeZone, Utc};

    async fn test_service() -> ChatLogService {
        let config = DatabaseConfig {
            url: ":memory:".to_string(),
            auth_token: None,
            local_path: None,
        };
        let db = Database::new(&config).await.unwrap();
        let backend: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(db));
        ChatLogService::new(backend)
    }

    async fn seed_sessions(service: &ChatLogService, count: usize) {
        for i in 0..count {
            service
                .db
                .create_chat_session(&ChatSession {
                    chat_id: format!("c{i}"),
                    app_id: "app_1".to_string(),
                    user_id: "u1".to_string(),
                    title: format!("t{i}"),
                    source: "online".to_string(),
                    updated_at: Utc.with_ymd_and_hms(2024, 5, 1, i as u32 + 1, 0, 0).unwrap(),
                })
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_malformed_app_id_rejected() {
        let service = test_service().await;

        let err = service
            .query("u1", "no spaces allowed", 1, 20)
            .await
            .unwrap_err();
        assert!(matches!(err, CuratorError::Validation(_)));

        let err = service.query("u1", "", 1, 20).await.unwrap_err();
        assert!(matches!(err, CuratorError::Validation(_)));
    }

    #[tokio::test]
    async fn test_page_and_total_reflect_same_filter() {
        let service = test_service().await;
        seed_sessions(&service, 5).await;

        let page = service.query("u1", "app_1", 1, 2).await.unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.total, 5);
        assert_eq!(page.page_num, 1);
        assert_eq!(page.page_size, 2);

        let other_user = service.query("u2", "app_1", 1, 2).await.unwrap();
        assert!(other_user.data.is_empty());
        assert_eq!(other_user.total, 0);
    }

    #[tokio::test]
    async fn test_out_of_range_paging_is_clamped() {
        let service = test_service().await;
        seed_sessions(&service, 1).await;

        let page = service.query("u1", "app_1", 0, 0).await.unwrap();
        assert_eq!(page.page_num, 1);
        assert_eq!(page.page_size, 1);
        assert_eq!(page.data.len(), 1);
    }

    #[tokio::test]
    async fn test_page_beyond_end_is_empty_with_full_total() {
        let service = test_service().await;
        seed_sessions(&service, 3).await;

        let page = service.query("u1", "app_1", 9, 20).await.unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total, 3);
    }
}
