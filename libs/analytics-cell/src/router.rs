use axum::{routing::get, Router};

use crate::handlers::*;
use crate::AnalyticsCellState;

pub fn create_analytics_router(state: AnalyticsCellState) -> Router {
    Router::new()
        .route("/appointments-by-branch", get(appointments_by_branch))
        .route("/appointments-by-service", get(appointments_by_service))
        .route("/peak-times", get(peak_times))
        .with_state(state)
}
