use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};

use santa_core::{AdminAuth, AssignmentStore, Generator, Notifier, ParticipantStore};
use santa_types::api::{LoginRequest, LoginResponse, StatusResponse};

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub participants: Arc<dyn ParticipantStore>,
    pub assignments: Arc<dyn AssignmentStore>,
    /// `None` when no sender credentials are configured.
    pub notifier: Option<Arc<dyn Notifier>>,
    pub auth: AdminAuth,
    pub generator: Generator,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.auth.authenticate(req.password.trim())?;
    let token = state.auth.issue_token(&session)?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Authentication successful".into(),
        token,
    }))
}

/// Tokens are stateless; the client forgets its own.
pub async fn logout() -> impl IntoResponse {
    Json(StatusResponse::ok("Logged out successfully"))
}
