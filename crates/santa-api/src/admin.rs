use axum::{Extension, Json, extract::State, response::IntoResponse};
use tracing::info;

use santa_core::AdminSession;
use santa_core::draw;
use santa_core::notify::notify_all;
use santa_types::api::{GenerateRequest, GenerateResponse, OverviewResponse};
use santa_types::models::NotificationOutcome;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::run_blocking;

pub async fn overview(
    State(state): State<AppState>,
    Extension(_session): Extension<AdminSession>,
) -> Result<impl IntoResponse, ApiError> {
    let (participants, assignments) = run_blocking(move || {
        Ok((state.participants.list()?, state.assignments.load_all()?))
    })
    .await?;

    Ok(Json(OverviewResponse { participants, assignments }))
}

/// Draw, persist and (unless skipped) email everyone.
///
/// Regenerating over an existing set is allowed here; the CLI is where the
/// confirmation prompt lives. A request without a body draws and emails.
pub async fn generate_assignments(
    State(state): State<AppState>,
    Extension(session): Extension<AdminSession>,
    req: Option<Json<GenerateRequest>>,
) -> Result<impl IntoResponse, ApiError> {
    let skip_email = req.map(|Json(req)| req).unwrap_or_default().skip_email;

    let (count, email_results) = run_blocking(move || {
        let mut rng = rand::rng();
        let outcome = draw::execute(
            &session,
            state.participants.as_ref(),
            state.assignments.as_ref(),
            &state.generator,
            &mut rng,
        )?;

        let email_results = if skip_email {
            Vec::new()
        } else if let Some(notifier) = &state.notifier {
            notify_all(&outcome.participants, &outcome.assignments, notifier.as_ref())
        } else {
            vec![NotificationOutcome::unconfigured()]
        };

        Ok((outcome.assignments.len(), email_results))
    })
    .await?;

    info!(count, skip_email, sent = email_results.iter().filter(|r| r.success).count(), "Draw complete");

    Ok(Json(GenerateResponse {
        success: true,
        message: format!("Successfully generated assignments for {count} participants!"),
        email_results,
        skip_email,
    }))
}
