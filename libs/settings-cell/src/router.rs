use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::*;
use crate::SettingsCellState;

pub fn create_settings_router(state: SettingsCellState) -> Router {
    Router::new()
        .route("/global", get(get_global_config))
        .route("/global", put(update_global_config))
        .route("/overrides", get(list_branch_overrides))
        .route("/branch/{branch_id}", get(get_branch_override))
        .route("/branch/{branch_id}", put(update_branch_override))
        .route(
            "/branch/{branch_id}/effective",
            get(get_effective_branch_settings),
        )
        .route("/refresh", post(refresh_settings))
        .with_state(state)
}
