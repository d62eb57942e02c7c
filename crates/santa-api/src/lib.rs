pub mod admin;
pub mod auth;
pub mod error;
pub mod middleware;
pub mod participants;

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tracing::error;

use crate::auth::AppState;
use crate::error::ApiError;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/register", post(participants::register))
        .route("/participants", get(participants::list))
        .route("/check-assignment", post(participants::check_assignment))
        .route("/admin/login", post(auth::login))
        .route("/admin/logout", post(auth::logout))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/admin/overview", get(admin::overview))
        .route("/generate-assignments", post(admin::generate_assignments))
        .layer(from_fn_with_state(state.clone(), middleware::require_admin));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Run store, draw and SMTP work off the async runtime.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.to_string())
        })?
}
