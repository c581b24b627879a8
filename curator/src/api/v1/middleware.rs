//! # V1 Bearer Token Authentication
//!
//! Protects all v1 API routes (except explicitly public ones like `/health`)
//! with Bearer token authentication. Each configured token maps to a caller
//! user id (`CURATOR_API_TOKENS=token:user,...`); the resolved identity is
//! attached to the request as an [`AuthUser`] extension so handlers can scope
//! queries to the caller.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::state::AppState;

use super::response::{ApiResponse, ErrorCode};

/// Caller identity resolved from the bearer token. Never client-supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser(pub String);

/// Axum middleware that authenticates v1 API requests and resolves the
/// caller identity.
///
/// # Behavior
///
/// - If `CURATOR_API_TOKENS` is empty/unset → 401 with JSON error envelope.
///   The server still starts, but protected routes are locked down.
/// - If the `Authorization: Bearer <token>` header is missing or malformed → 401.
/// - If the token is not in the configured map → 401.
/// - If the token is valid → the mapped user id rides the request as an
///   [`AuthUser`] extension and the request proceeds.
///
/// # Error format
///
/// All errors are returned as `ApiResponse<()>` JSON envelopes:
/// ```json
/// { "error": { "code": "unauthorized", "message": "..." } }
/// ```
pub async fn v1_auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if state.config.server.api_tokens.is_empty() {
        return ApiResponse::<()>::error(
            ErrorCode::Unauthorized,
            "API tokens not configured. Set CURATOR_API_TOKENS to enable access.",
        )
        .into_response();
    }

    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(h) if h.starts_with("Bearer ") => &h[7..],
        Some(_) => {
            return ApiResponse::<()>::error(
                ErrorCode::Unauthorized,
                "Invalid authorization header format. Expected: Bearer <token>",
            )
            .into_response();
        }
        None => {
            return ApiResponse::<()>::error(
                ErrorCode::Unauthorized,
                "Missing authorization header",
            )
            .into_response();
        }
    };

    match state.config.server.api_tokens.get(token) {
        Some(user_id) => {
            request.extensions_mut().insert(AuthUser(user_id.clone()));
            next.run(request).await
        }
        None => {
            ApiResponse::<()>::error(ErrorCode::Unauthorized, "Invalid API token").into_response()
        }
    }
}
