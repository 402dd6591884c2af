use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

pub const API_KEY_HEADER: &str = "x-internal-api-key";

/// Rejects requests whose `X-Internal-API-Key` header does not match the configured key.
pub async fn require_internal_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if provided != Some(state.config.internal_api_key.as_str()) {
        warn!(path = %request.uri().path(), "rejected request with missing or invalid API key");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}
