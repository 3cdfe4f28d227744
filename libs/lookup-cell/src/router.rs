use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::handlers::*;
use crate::LookupCellState;

pub fn create_lookup_router(state: LookupCellState) -> Router {
    let branches = Router::new()
        .route("/", get(list_branches))
        .route("/", post(create_branch))
        .route("/district/{district}", get(branches_by_district))
        .route("/{id}", get(get_branch))
        .route("/{id}", delete(delete_branch));

    let services = Router::new()
        .route("/", get(list_services))
        .route("/", post(create_service))
        .route("/branch/{branch_id}", get(services_by_branch))
        .route("/{id}", get(get_service))
        .route("/{id}", delete(delete_service));

    let districts = Router::new()
        .route("/", get(list_districts))
        .route("/", post(create_district))
        .route("/provinces", get(list_provinces))
        .route("/province/{province}", get(districts_by_province))
        .route("/{id}", delete(delete_district));

    let branch_services = Router::new()
        .route("/", get(list_branch_services))
        .route("/", post(create_branch_service))
        .route("/branch/{branch_id}", get(branch_services_by_branch))
        .route("/{id}", get(get_branch_service))
        .route("/{id}", delete(delete_branch_service));

    Router::new()
        .route("/lookup/refresh", post(refresh_lookup))
        .nest("/branches", branches)
        .nest("/services", services)
        .nest("/districts", districts)
        .nest("/branch-services", branch_services)
        .with_state(state)
}
