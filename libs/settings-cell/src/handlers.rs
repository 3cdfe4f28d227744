use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::entities::{BranchConfigOverride, GlobalConfig};
use shared_models::error::AppError;

use crate::models::UpdateBranchOverrideRequest;
use crate::SettingsCellState;

#[axum::debug_handler]
pub async fn get_global_config(
    State(state): State<SettingsCellState>,
) -> Result<Json<Value>, AppError> {
    let config = state
        .settings
        .global()
        .await
        .ok_or_else(|| AppError::NotFound("service is not configured".to_string()))?;
    Ok(Json(json!(config)))
}

#[axum::debug_handler]
pub async fn update_global_config(
    State(state): State<SettingsCellState>,
    Json(config): Json<GlobalConfig>,
) -> Result<Json<Value>, AppError> {
    let saved = state
        .settings
        .update_global(config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(Json(json!(saved)))
}

#[axum::debug_handler]
pub async fn list_branch_overrides(
    State(state): State<SettingsCellState>,
) -> Result<Json<Value>, AppError> {
    let overrides = state.settings.all_overrides().await;
    Ok(Json(json!(overrides)))
}

#[axum::debug_handler]
pub async fn get_branch_override(
    State(state): State<SettingsCellState>,
    Path(branch_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let record = state
        .settings
        .override_for(branch_id)
        .await
        .ok_or_else(|| {
            AppError::NotFound(format!("no override for branch {}", branch_id))
        })?;
    Ok(Json(json!(record)))
}

#[axum::debug_handler]
pub async fn update_branch_override(
    State(state): State<SettingsCellState>,
    Path(branch_id): Path<i64>,
    Json(request): Json<UpdateBranchOverrideRequest>,
) -> Result<Json<Value>, AppError> {
    let record = BranchConfigOverride {
        id: 0,
        branch_id,
        queue_threshold_low: request.queue_threshold_low,
        queue_threshold_moderate: request.queue_threshold_moderate,
        slot_duration_mins: request.slot_duration_mins,
        max_appointments_per_slot: request.max_appointments_per_slot,
        last_updated: None,
    };
    let saved = state
        .settings
        .save_override(record)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(Json(json!(saved)))
}

#[axum::debug_handler]
pub async fn get_effective_branch_settings(
    State(state): State<SettingsCellState>,
    Path(branch_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let effective = state
        .settings
        .effective_for_branch(branch_id)
        .await
        .ok_or_else(|| AppError::NotFound("service is not configured".to_string()))?;
    Ok(Json(json!(effective)))
}

#[axum::debug_handler]
pub async fn refresh_settings(
    State(state): State<SettingsCellState>,
) -> Result<Json<Value>, AppError> {
    state
        .settings
        .refresh()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(Json(json!({ "refreshed": true })))
}
