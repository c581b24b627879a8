//! Chat-log request/response DTOs for the v1 API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models;

fn default_page_num() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

/// Request body for `POST /v1/chat-logs:query`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatLogQueryRequest {
    /// Application whose sessions are listed. Required; its absence is a
    /// client error reported before any datastore access.
    pub app_id: Option<String>,
    /// 1-based page number.
    #[serde(default = "default_page_num")]
    pub page_num: u32,
    /// Rows per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// One ranked chat-log row.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatLogRowResponse {
    /// Session key.
    pub id: String,
    pub title: String,
    pub source: String,
    /// Last-update timestamp of the session.
    #[schema(value_type = String)]
    pub time: DateTime<Utc>,
    pub message_count: u32,
    pub feedback_count: u32,
    pub mark_count: u32,
}

impl From<models::ChatLogRow> for ChatLogRowResponse {
    fn from(row: models::ChatLogRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            source: row.source,
            time: row.time,
            message_count: row.message_count,
            feedback_count: row.feedback_count,
            mark_count: row.mark_count,
        }
    }
}

/// Response body for `POST /v1/chat-logs:query`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatLogPageResponse {
    pub page_num: u32,
    pub page_size: u32,
    /// Rows ordered by feedback volume, then recency.
    pub data: Vec<ChatLogRowResponse>,
    /// Unsliced count of sessions matching the filter.
    pub total: u64,
}

impl From<models::ChatLogPage> for ChatLogPageResponse {
    fn from(page: models::ChatLogPage) -> Self {
        Self {
            page_num: page.page_num,
            page_size: page.page_size,
            data: page.data.into_iter().map(Into::into).collect(),
            total: page.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_request_applies_paging_defaults() {
        let json = r#"{ "appId": "a1" }"#;
        let req: ChatLogQueryRequest = serde_json::from_str(json).expect("deserialize");
        assert_eq!(req.app_id.as_deref(), Some("a1"));
        assert_eq!(req.page_num, 1);
        assert_eq!(req.page_size, 20);
    }

    #[test]
    fn query_request_without_app_id_deserializes() {
        let req: ChatLogQueryRequest = serde_json::from_str("{}").expect("deserialize");
        assert!(req.app_id.is_none());
    }

    #[test]
    fn page_response_serializes_camel_case() {
        let page = ChatLogPageResponse {
            page_num: 1,
            page_size: 20,
            data: vec![],
            total: 0,
        };
        let json = serde_json::to_value(&page).expect("serialize");
        assert_eq!(json["pageNum"], 1);
        assert_eq!(json["pageSize"], 20);
        assert_eq!(json["total"], 0);
    }
}
