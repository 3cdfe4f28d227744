use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{
    AppointmentFilter, CreateAppointmentRequest, DateAndBranchQuery, DateAndBranchServiceQuery,
    FilteredAppointmentsQuery, UpdateStatusRequest,
};
use crate::services::{AppointmentQueryService, BookingService};
use crate::AppointmentCellState;

fn booking(state: &AppointmentCellState) -> BookingService {
    BookingService::new(state.store.clone(), state.lookup.clone())
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppointmentCellState>,
) -> Result<Json<Value>, AppError> {
    let appointments = booking(&state)
        .list_all()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppointmentCellState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let appointment = booking(&state)
        .get(id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("appointment {} not found", id)))?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<AppointmentCellState>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    if state
        .lookup
        .resolve_branch_service(request.branch_service_id)
        .await
        .is_none()
    {
        return Err(AppError::ValidationError(format!(
            "branch-service {} does not exist",
            request.branch_service_id
        )));
    }

    let appointment = booking(&state)
        .create(request)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn create_appointments_batch(
    State(state): State<AppointmentCellState>,
    Json(requests): Json<Vec<CreateAppointmentRequest>>,
) -> Result<Json<Value>, AppError> {
    let outcome = booking(&state).create_batch(requests).await;
    Ok(Json(json!(outcome)))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<AppointmentCellState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    booking(&state)
        .delete(id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(Json(json!({ "deleted": id })))
}

#[axum::debug_handler]
pub async fn update_appointment_status(
    State(state): State<AppointmentCellState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let updated = booking(&state)
        .update_status(id, request.status)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("appointment {} not found", id)))?;
    Ok(Json(json!(updated)))
}

#[axum::debug_handler]
pub async fn appointments_by_date(
    State(state): State<AppointmentCellState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<Value>, AppError> {
    let appointments = booking(&state)
        .by_date(date)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn appointments_by_user(
    State(state): State<AppointmentCellState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let appointments = booking(&state)
        .by_user(user_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn today_by_district(
    State(state): State<AppointmentCellState>,
    Path(district): Path<String>,
) -> Result<Json<Value>, AppError> {
    let appointments = booking(&state)
        .today_by_district(&district)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn today_by_branch(
    State(state): State<AppointmentCellState>,
    Path(branch_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let appointments = booking(&state)
        .today_by_branch(branch_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn today_by_district_and_service(
    State(state): State<AppointmentCellState>,
    Path((district, service_id)): Path<(String, i64)>,
) -> Result<Json<Value>, AppError> {
    let appointments = booking(&state)
        .today_by_district_and_service(&district, service_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn appointments_by_date_and_branch(
    State(state): State<AppointmentCellState>,
    Query(query): Query<DateAndBranchQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = booking(&state)
        .by_date_and_branch(query.date, query.branch_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn appointments_by_date_and_branch_service(
    State(state): State<AppointmentCellState>,
    Query(query): Query<DateAndBranchServiceQuery>,
) -> Result<Json<Value>, AppError> {
    let appointments = booking(&state)
        .by_date_and_branch_service(query.date, query.branch_service_id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn filtered_appointments(
    State(state): State<AppointmentCellState>,
    Query(query): Query<FilteredAppointmentsQuery>,
) -> Result<Json<Value>, AppError> {
    let filter = AppointmentFilter {
        date_from: query.date_from,
        date_to: query.date_to,
        branch_id: query.branch_id,
        service_id: query.service_id,
        status: query.status,
        district: query.district,
    };

    let resolver = AppointmentQueryService::new(state.store.clone(), state.lookup.clone());
    let page = resolver
        .find_filtered(&filter, query.page, query.size)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!(page)))
}
