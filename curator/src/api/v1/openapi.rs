use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Curator API",
        version = "1.0.0",
        description = "Operations backend for chat applications: ranked chat-log analytics and knowledge-base curation.",
    ),
    paths(
        handlers::health::health_check,
        handlers::chat_logs::query_chat_logs,
        handlers::knowledge::create_kb,
        handlers::knowledge::get_kb,
        handlers::knowledge::create_entry,
        handlers::knowledge::update_entry,
        handlers::knowledge::delete_entry,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        // Chat logs
        dto::chat_logs::ChatLogQueryRequest,
        dto::chat_logs::ChatLogRowResponse,
        dto::chat_logs::ChatLogPageResponse,
        // Knowledge
        dto::knowledge::V1EntrySource,
        dto::knowledge::CreateKbRequest,
        dto::knowledge::KbMetadataResponse,
        dto::knowledge::CreateEntryRequest,
        dto::knowledge::UpdateEntryRequest,
        dto::knowledge::EntryResponse,
        dto::knowledge::DeleteEntryResponse,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "chat-logs", description = "Ranked, paginated chat-session listings"),
        (name = "knowledge", description = "Knowledge-base and entry curation"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
