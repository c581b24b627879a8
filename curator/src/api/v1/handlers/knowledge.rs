//! v1 Knowledge-base handlers.

use axum::extract::{Path, State};

use crate::api::v1::dto::{
    CreateEntryRequest, CreateKbRequest, DeleteEntryResponse, EntryResponse, KbMetadataResponse,
    UpdateEntryRequest,
};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::models::{EntrySource, KbMetadata};

/// Checks the entry fields against the kb's matching-model bound and the
/// fixed answer bound. Lengths are counted in Unicode scalar values.
fn validate_entry_fields(
    q: &str,
    a: &str,
    max_token: usize,
    answer_max_len: usize,
) -> Option<(ErrorCode, String)> {
    if q.trim().is_empty() {
        return Some((ErrorCode::InvalidRequest, "q cannot be empty".to_string()));
    }
    if q.chars().count() >= max_token {
        return Some((
            ErrorCode::InvalidRequest,
            format!("q must be shorter than the model limit of {max_token} characters"),
        ));
    }
    if a.chars().count() > answer_max_len {
        return Some((
            ErrorCode::InvalidRequest,
            format!("a cannot exceed {answer_max_len} characters"),
        ));
    }
    None
}

/// `POST /api/v1/kbs`
#[utoipa::path(
    post,
    path = "/api/v1/kbs",
    tag = "knowledge",
    operation_id = "kbs.create",
    request_body = CreateKbRequest,
    responses(
        (status = 201, description = "Knowledge base created", body = KbMetadataResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_kb(
    State(state): State<AppState>,
    axum::Json(req): axum::Json<CreateKbRequest>,
) -> ApiResponse<KbMetadataResponse> {
    if req.name.trim().is_empty() {
        return ApiResponse::error(ErrorCode::InvalidRequest, "name cannot be empty");
    }

    let model = req
        .model
        .unwrap_or_else(|| state.config.knowledge.default_model.clone());

    match state.db.create_knowledge_base(&req.name, &model).await {
        Ok(kb) => {
            let max_token = state.config.knowledge.max_token_for(&kb.model);
            ApiResponse::created(KbMetadataResponse::from(KbMetadata {
                kb_id: kb.id,
                name: kb.name,
                model: kb.model,
                max_token,
            }))
        }
        Err(e) => e.into(),
    }
}

/// `GET /api/v1/kbs/{kbId}`
///
/// Metadata companion read: callers use `maxToken` to bound form input
/// before attempting a create or update.
#[utoipa::path(
    get,
    path = "/api/v1/kbs/{kbId}",
    tag = "knowledge",
    operation_id = "kbs.get",
    params(("kbId" = String, Path, description = "Knowledge base ID")),
    responses(
        (status = 200, description = "Knowledge base metadata", body = KbMetadataResponse),
        (status = 404, description = "Knowledge base not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_kb(
    State(state): State<AppState>,
    Path(kb_id): Path<String>,
) -> ApiResponse<KbMetadataResponse> {
    match state.db.get_knowledge_base(&kb_id).await {
        Ok(Some(kb)) => {
            let max_token = state.config.knowledge.max_token_for(&kb.model);
            ApiResponse::success(KbMetadataResponse::from(KbMetadata {
                kb_id: kb.id,
                name: kb.name,
                model: kb.model,
                max_token,
            }))
        }
        Ok(None) => {
            ApiResponse::error(ErrorCode::NotFound, format!("Knowledge base {kb_id} not found"))
        }
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/kbs/{kbId}/entries`
#[utoipa::path(
    post,
    path = "/api/v1/kbs/{kbId}/entries",
    tag = "knowledge",
    operation_id = "entries.create",
    params(("kbId" = String, Path, description = "Knowledge base ID")),
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry created", body = EntryResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Knowledge base not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_entry(
    State(state): State<AppState>,
    Path(kb_id): Path<String>,
    axum::Json(req): axum::Json<CreateEntryRequest>,
) -> ApiResponse<EntryResponse> {
    let kb = match state.db.get_knowledge_base(&kb_id).await {
        Ok(Some(kb)) => kb,
        Ok(None) => {
            return ApiResponse::error(
                ErrorCode::NotFound,
                format!("Knowledge base {kb_id} not found"),
            );
        }
        Err(e) => return e.into(),
    };

    let max_token = state.config.knowledge.max_token_for(&kb.model);
    if let Some((code, message)) = validate_entry_fields(
        &req.q,
        &req.a,
        max_token,
        state.config.knowledge.answer_max_len,
    ) {
        return ApiResponse::error(code, message);
    }

    let source: EntrySource = req.source.map(Into::into).unwrap_or_default();

    match state.db.create_entry(&kb.id, &req.q, &req.a, source).await {
        Ok(entry) => ApiResponse::created(EntryResponse::from(entry)),
        Err(e) => e.into(),
    }
}

/// `PATCH /api/v1/entries/{dataId}`
///
/// `a` always replaces the stored answer; an empty `q` signals "no
/// change" and leaves the stored question (and anything indexed on it)
/// as-is.
#[utoipa::path(
    patch,
    path = "/api/v1/entries/{dataId}",
    tag = "knowledge",
    operation_id = "entries.update",
    params(("dataId" = String, Path, description = "Entry ID")),
    request_body = UpdateEntryRequest,
    responses(
        (status = 200, description = "Entry updated", body = EntryResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Entry or knowledge base not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_entry(
    State(state): State<AppState>,
    Path(data_id): Path<String>,
    axum::Json(req): axum::Json<UpdateEntryRequest>,
) -> ApiResponse<EntryResponse> {
    let kb = match state.db.get_knowledge_base(&req.kb_id).await {
        Ok(Some(kb)) => kb,
        Ok(None) => {
            return ApiResponse::error(
                ErrorCode::NotFound,
                format!("Knowledge base {} not found", req.kb_id),
            );
        }
        Err(e) => return e.into(),
    };

    let max_token = state.config.knowledge.max_token_for(&kb.model);
    if !req.q.is_empty() && req.q.chars().count() >= max_token {
        return ApiResponse::error(
            ErrorCode::InvalidRequest,
            format!("q must be shorter than the model limit of {max_token} characters"),
        );
    }
    if req.a.chars().count() > state.config.knowledge.answer_max_len {
        return ApiResponse::error(
            ErrorCode::InvalidRequest,
            format!(
                "a cannot exceed {} characters",
                state.config.knowledge.answer_max_len
            ),
        );
    }

    let question = if req.q.is_empty() {
        None
    } else {
        Some(req.q.as_str())
    };

    match state.db.update_entry(&data_id, question, &req.a).await {
        Ok(true) => match state.db.get_entry(&data_id).await {
            Ok(Some(entry)) => ApiResponse::success(EntryResponse::from(entry)),
            Ok(None) => {
                ApiResponse::error(ErrorCode::NotFound, format!("Entry {data_id} not found"))
            }
            Err(e) => e.into(),
        },
        Ok(false) => ApiResponse::error(ErrorCode::NotFound, format!("Entry {data_id} not found")),
        Err(e) => e.into(),
    }
}

/// `DELETE /api/v1/entries/{dataId}`
#[utoipa::path(
    delete,
    path = "/api/v1/entries/{dataId}",
    tag = "knowledge",
    operation_id = "entries.delete",
    params(("dataId" = String, Path, description = "Entry ID")),
    responses(
        (status = 200, description = "Entry deleted", body = DeleteEntryResponse),
        (status = 404, description = "Entry not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(data_id): Path<String>,
) -> ApiResponse<DeleteEntryResponse> {
    match state.db.delete_entry(&data_id).await {
        Ok(true) => ApiResponse::success(DeleteEntryResponse { data_id }),
        Ok(false) => ApiResponse::error(ErrorCode::NotFound, format!("Entry {data_id} not found")),
        Err(e) => e.into(),
    }
}
