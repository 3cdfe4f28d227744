use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::handlers::*;
use crate::AppointmentCellState;

pub fn create_appointment_router(state: AppointmentCellState) -> Router {
    Router::new()
        .route("/", get(list_appointments))
        .route("/", post(create_appointment))
        .route("/batch", post(create_appointments_batch))
        .route("/filtered", get(filtered_appointments))
        .route("/date/{date}", get(appointments_by_date))
        .route("/date-and-branch", get(appointments_by_date_and_branch))
        .route(
            "/date-and-branch-service",
            get(appointments_by_date_and_branch_service),
        )
        .route("/user/{user_id}", get(appointments_by_user))
        .route("/today/district/{district}", get(today_by_district))
        .route(
            "/today/district/{district}/service/{service_id}",
            get(today_by_district_and_service),
        )
        .route("/today/branch/{branch_id}", get(today_by_branch))
        .route("/{id}", get(get_appointment))
        .route("/{id}", delete(delete_appointment))
        .route("/{id}/status", put(update_appointment_status))
        .with_state(state)
}
