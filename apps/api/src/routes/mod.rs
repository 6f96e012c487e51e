pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::matching::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/resumes/fetch", post(handlers::handle_match_resumes))
        .route("/api/resumes", get(handlers::handle_available_resumes))
        .route(
            "/api/resumes/:id/ranking",
            get(handlers::handle_resume_ranking),
        )
        .with_state(state)
}
