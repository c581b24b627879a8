use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::middleware::v1_auth_middleware;

pub fn v1_router(state: AppState) -> Router<AppState> {
    let kbs = Router::new()
        .route("/", post(handlers::knowledge::create_kb))
        .route("/{kbId}", get(handlers::knowledge::get_kb))
        .route("/{kbId}/entries", post(handlers::knowledge::create_entry));

    let entries = Router::new().route(
        "/{dataId}",
        patch(handlers::knowledge::update_entry).delete(handlers::knowledge::delete_entry),
    );

    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router());

    let protected_routes = Router::new()
        .route(
            "/chat-logs:query",
            post(handlers::chat_logs::query_chat_logs),
        )
        .nest("/kbs", kbs)
        .nest("/entries", entries)
        .route_layer(middleware::from_fn_with_state(state, v1_auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}
