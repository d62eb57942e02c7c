use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use santa_core::AuthError;

use crate::auth::AppState;
use crate::error::ApiError;

/// Validate the bearer token and attach the resulting `AdminSession`.
pub async fn require_admin(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(AuthError::InvalidToken)?;

    let session = state.auth.verify_token(token)?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
