//! v1 Chat-log handlers.

use axum::extract::State;
use axum::Extension;

use crate::api::v1::dto::{ChatLogPageResponse, ChatLogQueryRequest};
use crate::api::v1::middleware::AuthUser;
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;

/// `POST /api/v1/chat-logs:query`
///
/// Returns one page of the caller's chat sessions for an application,
/// ranked by feedback volume then recency, with the unsliced total for
/// pagination. The page and the total are computed concurrently over the
/// same filter.
#[utoipa::path(
    post,
    path = "/api/v1/chat-logs:query",
    tag = "chat-logs",
    operation_id = "chatLogs.query",
    request_body = ChatLogQueryRequest,
    responses(
        (status = 200, description = "Ranked chat-log page", body = ChatLogPageResponse),
        (status = 400, description = "Missing or malformed appId", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn query_chat_logs(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    axum::Json(req): axum::Json<ChatLogQueryRequest>,
) -> ApiResponse<ChatLogPageResponse> {
    // Rejected before any datastore access.
    let Some(app_id) = req.app_id else {
        return ApiResponse::error(ErrorCode::InvalidRequest, "appId is required");
    };

    match state
        .chat_logs
        .query(&user.0, &app_id, req.page_num, req.page_size)
        .await
    {
        Ok(page) => ApiResponse::success(ChatLogPageResponse::from(page)),
        Err(e) => e.into(),
    }
}
