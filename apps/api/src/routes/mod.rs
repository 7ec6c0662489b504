pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::get,
    Router,
};

use crate::auth::require_session;
use crate::state::AppState;
use crate::submission::handlers;

/// Upload cap, comfortably above any realistic resume document.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    // Everything under /api/v1/submissions requires a resolved session.
    let submissions = Router::new()
        .route(
            "/api/v1/submissions",
            get(handlers::handle_list_submissions).post(handlers::handle_analyze),
        )
        .route(
            "/api/v1/submissions/:id",
            get(handlers::handle_get_submission),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/health", get(health::health_handler))
        .merge(submissions)
        .with_state(state)
}
