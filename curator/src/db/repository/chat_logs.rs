use chrono::{DateTime, Utc};
use libsql::{params, Connection};

use crate::error::Result;
use crate::models::{ChatLogRequest, ChatLogRow, ChatMessageItem, ChatRole, ChatSession};

pub struct ChatLogRepository;

impl ChatLogRepository {
    pub async fn create_session(conn: &Connection, session: &ChatSession) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO chat_sessions (chat_id, app_id, user_id, title, source, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                session.chat_id.clone(),
                session.app_id.clone(),
                session.user_id.clone(),
                session.title.clone(),
                session.source.clone(),
                session.updated_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn create_message(conn: &Connection, message: &ChatMessageItem) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO chat_messages (id, chat_id, role, content, user_feedback, admin_feedback, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                message.id.clone(),
                message.chat_id.clone(),
                message.role.to_string(),
                message.content.clone(),
                message.user_feedback.map(i64::from),
                message.admin_feedback.map(i64::from),
                message.created_at.to_rfc3339(),
            ],
        )
        .await?;

        Ok(())
    }

    /// Ranked page over `(app_id, user_id)`: left-join message items by
    /// session key, derive the three counts, order by feedback volume then
    /// recency, then slice.
    pub async fn list(conn: &Connection, req: &ChatLogRequest) -> Result<Vec<ChatLogRow>> {
        let limit = req.page_size as i64;
        let offset = (req.page_num.max(1) as i64 - 1) * limit;

        let mut rows = conn
            .query(
                r#"
                SELECT
                    s.chat_id,
                    s.title,
                    s.source,
                    s.updated_at,
                    COUNT(m.id) AS message_count,
                    COALESCE(SUM(CASE WHEN m.user_feedback = 1 THEN 1 ELSE 0 END), 0) AS feedback_count,
                    COALESCE(SUM(CASE WHEN m.admin_feedback = 1 THEN 1 ELSE 0 END), 0) AS mark_count
                FROM chat_sessions s
                LEFT JOIN chat_messages m ON m.chat_id = s.chat_id
                WHERE s.app_id = ?1 AND s.user_id = ?2
                GROUP BY s.chat_id, s.title, s.source, s.updated_at
                ORDER BY feedback_count DESC, s.updated_at DESC
                LIMIT ?3 OFFSET ?4
                "#,
                params![req.app_id.clone(), req.user_id.clone(), limit, offset],
            )
            .await?;

        let mut logs = Vec::new();
        while let Some(row) = rows.next().await? {
            logs.push(Self::row_to_log(&row)?);
        }

        Ok(logs)
    }

    /// Unsliced total over the same filter predicate as [`Self::list`].
    pub async fn count(conn: &Connection, app_id: &str, user_id: &str) -> Result<u64> {
        let mut rows = conn
            .query(
                "SELECT COUNT(*) FROM chat_sessions WHERE app_id = ?1 AND user_id = ?2",
                params![app_id, user_id],
            )
            .await?;

        let total: i64 = if let Some(row) = rows.next().await? {
            row.get(0)?
        } else {
            0
        };

        Ok(total as u64)
    }

    fn row_to_log(row: &libsql::Row) -> Result<ChatLogRow> {
        Ok(ChatLogRow {
            id: row.get(0)?,
            title: row.get(1)?,
            source: row.get(2)?,
            time: DateTime::parse_from_rfc3339(&row.get::<String>(3)?)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|_| Utc::now()),
            message_count: row.get::<i64>(4)? as u32,
            feedback_count: row.get::<i64>(5)? as u32,
            mark_count: row.get::<i64>(6)? as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    async fn setup_test_db() -> Connection {
        let conn = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .unwrap()
            .connect()
            .unwrap();

        crate::db::schema::init_schema(&conn).await.unwrap();
        conn
    }

    fn session(chat_id: &str, app_id: &str, user_id: &str, hour: u32) -> ChatSession {
        ChatSession {
            chat_id: chat_id.to_string(),
            app_id: app_id.to_string(),
            user_id: user_id.to_string(),
            title: format!("session {chat_id}"),
            source: "online".to_string(),
            updated_at: Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap(),
        }
    }

    fn message(
        id: &str,
        chat_id: &str,
        user_feedback: Option<bool>,
        admin_feedback: Option<bool>,
    ) -> ChatMessageItem {
        ChatMessageItem {
            id: id.to_string(),
            chat_id: chat_id.to_string(),
            role: ChatRole::Ai,
            content: "answer".to_string(),
            user_feedback,
            admin_feedback,
            created_at: Utc::now(),
        }
    }

    async fn seed_feedback(conn: &Connection, chat_id: &str, count: usize) {
        for i in 0..count {
            ChatLogRepository::create_message(
                conn,
                &message(&format!("{chat_id}-fb{i}"), chat_id, Some(true), None),
            )
            .await
            .unwrap();
        }
    }

    fn request(app_id: &str, user_id: &str, page_num: u32, page_size: u32) -> ChatLogRequest {
        ChatLogRequest {
            app_id: app_id.to_string(),
            user_id: user_id.to_string(),
            page_num,
            page_size,
        }
    }

    #[tokio::test]
    async fn test_ranked_order_and_total() {
        let conn = setup_test_db().await;

        // Three matching sessions with feedback counts [0, 3, 1].
        for (chat_id, hour) in [("c0", 1), ("c3", 2), ("c1", 3)] {
            ChatLogRepository::create_session(&conn, &session(chat_id, "a1", "u1", hour))
                .await
                .unwrap();
        }
        seed_feedback(&conn, "c3", 3).await;
        seed_feedback(&conn, "c1", 1).await;

        let page = ChatLogRepository::list(&conn, &request("a1", "u1", 1, 2))
            .await
            .unwrap();
        let total = ChatLogRepository::count(&conn, "a1", "u1").await.unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page[0].id, "c3");
        assert_eq!(page[0].feedback_count, 3);
        assert_eq!(page[1].id, "c1");
        assert_eq!(page[1].feedback_count, 1);
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn test_recency_breaks_feedback_ties() {
        let conn = setup_test_db().await;

        ChatLogRepository::create_session(&conn, &session("older", "a1", "u1", 1))
            .await
            .unwrap();
        ChatLogRepository::create_session(&conn, &session("newer", "a1", "u1", 9))
            .await
            .unwrap();

        let page = ChatLogRepository::list(&conn, &request("a1", "u1", 1, 10))
            .await
            .unwrap();

        assert_eq!(page[0].id, "newer");
        assert_eq!(page[1].id, "older");
    }

    #[tokio::test]
    async fn test_counts_are_derived_from_flag_presence() {
        let conn = setup_test_db().await;

        ChatLogRepository::create_session(&conn, &session("c1", "a1", "u1", 1))
            .await
            .unwrap();
        let messages = [
            message("m1", "c1", Some(true), Some(true)),
            message("m2", "c1", Some(false), None),
            message("m3", "c1", None, Some(true)),
            message("m4", "c1", None, Some(false)),
        ];
        for m in &messages {
            ChatLogRepository::create_message(&conn, m).await.unwrap();
        }

        let page = ChatLogRepository::list(&conn, &request("a1", "u1", 1, 10))
            .await
            .unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].message_count, 4);
        assert_eq!(page[0].feedback_count, 1);
        assert_eq!(page[0].mark_count, 2);
        assert!(page[0].feedback_count <= page[0].message_count);
        assert!(page[0].mark_count <= page[0].message_count);
    }

    #[tokio::test]
    async fn test_session_without_messages_has_zero_counts() {
        let conn = setup_test_db().await;

        ChatLogRepository::create_session(&conn, &session("lonely", "a1", "u1", 1))
            .await
            .unwrap();

        let page = ChatLogRepository::list(&conn, &request("a1", "u1", 1, 10))
            .await
            .unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].message_count, 0);
        assert_eq!(page[0].feedback_count, 0);
        assert_eq!(page[0].mark_count, 0);
    }

    #[tokio::test]
    async fn test_filter_excludes_other_apps_and_users() {
        let conn = setup_test_db().await;

        ChatLogRepository::create_session(&conn, &session("mine", "a1", "u1", 1))
            .await
            .unwrap();
        ChatLogRepository::create_session(&conn, &session("other-app", "a2", "u1", 2))
            .await
            .unwrap();
        ChatLogRepository::create_session(&conn, &session("other-user", "a1", "u2", 3))
            .await
            .unwrap();

        let page = ChatLogRepository::list(&conn, &request("a1", "u1", 1, 10))
            .await
            .unwrap();
        let total = ChatLogRepository::count(&conn, "a1", "u1").await.unwrap();

        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "mine");
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_offset_slices_second_page() {
        let conn = setup_test_db().await;

        for i in 0..5 {
            ChatLogRepository::create_session(&conn, &session(&format!("c{i}"), "a1", "u1", i + 1))
                .await
                .unwrap();
        }

        let second = ChatLogRepository::list(&conn, &request("a1", "u1", 2, 2))
            .await
            .unwrap();
        let total = ChatLogRepository::count(&conn, "a1", "u1").await.unwrap();

        // All tied at zero feedback, so recency ordering: c4..c0.
        assert_eq!(second.len(), 2);
        assert_eq!(second[0].id, "c2");
        assert_eq!(second[1].id, "c1");
        assert_eq!(total, 5);
    }
}
