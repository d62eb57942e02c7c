use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use santa_core::{draw, registry};
use santa_types::api::{
    CheckAssignmentRequest, CheckAssignmentResponse, ParticipantsResponse, PublicParticipant,
    RegisterRequest, StatusResponse,
};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::run_blocking;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    run_blocking(move || {
        registry::register(state.participants.as_ref(), &req.name, &req.email)?;
        Ok(())
    })
    .await?;

    Ok((StatusCode::CREATED, Json(StatusResponse::ok("Successfully registered!"))))
}

/// Public roster: names only, emails stay private.
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let (participants, assignments) = run_blocking(move || {
        Ok((state.participants.list()?, state.assignments.load_all()?))
    })
    .await?;

    Ok(Json(ParticipantsResponse {
        participants: participants
            .into_iter()
            .map(|p| PublicParticipant { name: p.name, registered_at: p.registered_at })
            .collect(),
        assignments_generated: !assignments.is_empty(),
    }))
}

pub async fn check_assignment(
    State(state): State<AppState>,
    Json(req): Json<CheckAssignmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let giftee = run_blocking(move || {
        Ok(draw::lookup(state.participants.as_ref(), state.assignments.as_ref(), &req.email)?)
    })
    .await?;

    Ok(Json(CheckAssignmentResponse {
        success: true,
        giftee_name: giftee.name,
        giftee_email: giftee.email,
    }))
}
