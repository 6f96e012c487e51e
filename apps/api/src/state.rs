use std::sync::Arc;

use crate::matching::service::MatchingService;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub matching: Arc<MatchingService>,
}
