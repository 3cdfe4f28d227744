use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::entities::{Branch, BranchService, District, Service};
use shared_models::error::AppError;

use crate::models::{
    BranchServiceView, CreateBranchRequest, CreateBranchServiceRequest, CreateDistrictRequest,
    CreateServiceRequest,
};
use crate::services::LookupIndex;
use crate::LookupCellState;

async fn to_view(lookup: &LookupIndex, association: &BranchService) -> BranchServiceView {
    BranchServiceView {
        id: association.id,
        branch_id: association.branch_id,
        service_id: association.service_id,
        branch_name: lookup.branch_name(association.branch_id).await,
        service_name: lookup.service_name(association.service_id).await,
        district: lookup.district_of_branch(association.branch_id).await,
    }
}

#[axum::debug_handler]
pub async fn refresh_lookup(
    State(state): State<LookupCellState>,
) -> Result<Json<Value>, AppError> {
    state
        .lookup
        .refresh()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(Json(json!({ "refreshed": true })))
}

// Branches

#[axum::debug_handler]
pub async fn list_branches(State(state): State<LookupCellState>) -> Result<Json<Value>, AppError> {
    let branches = state
        .store
        .list_branches()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(Json(json!(branches)))
}

#[axum::debug_handler]
pub async fn get_branch(
    State(state): State<LookupCellState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let branch = state
        .lookup
        .branch(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("branch {} not found", id)))?;
    Ok(Json(json!(branch)))
}

#[axum::debug_handler]
pub async fn branches_by_district(
    State(state): State<LookupCellState>,
    Path(district): Path<String>,
) -> Result<Json<Value>, AppError> {
    let branches = state.lookup.branches_in_district(&district).await;
    Ok(Json(json!(branches)))
}

#[axum::debug_handler]
pub async fn create_branch(
    State(state): State<LookupCellState>,
    Json(request): Json<CreateBranchRequest>,
) -> Result<Json<Value>, AppError> {
    let branch = Branch {
        id: 0,
        name: request.name,
        address: request.address,
        district: request.district,
        province: request.province,
    };
    let saved = state
        .store
        .save_branch(branch)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    state.lookup.upsert_branch(saved.clone()).await;
    Ok(Json(json!(saved)))
}

#[axum::debug_handler]
pub async fn delete_branch(
    State(state): State<LookupCellState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state
        .store
        .delete_branch(id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    state.lookup.remove_branch(id).await;
    Ok(Json(json!({ "deleted": id })))
}

// Services

#[axum::debug_handler]
pub async fn list_services(State(state): State<LookupCellState>) -> Result<Json<Value>, AppError> {
    let services = state
        .store
        .list_services()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(Json(json!(services)))
}

#[axum::debug_handler]
pub async fn get_service(
    State(state): State<LookupCellState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = state
        .lookup
        .service(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("service {} not found", id)))?;
    Ok(Json(json!(service)))
}

#[axum::debug_handler]
pub async fn services_by_branch(
    State(state): State<LookupCellState>,
    Path(branch_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let services = state.lookup.services_at_branch(branch_id).await;
    Ok(Json(json!(services)))
}

#[axum::debug_handler]
pub async fn create_service(
    State(state): State<LookupCellState>,
    Json(request): Json<CreateServiceRequest>,
) -> Result<Json<Value>, AppError> {
    let service = Service {
        id: 0,
        name: request.name,
        description: request.description,
    };
    let saved = state
        .store
        .save_service(service)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    state.lookup.upsert_service(saved.clone()).await;
    Ok(Json(json!(saved)))
}

#[axum::debug_handler]
pub async fn delete_service(
    State(state): State<LookupCellState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state
        .store
        .delete_service(id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    state.lookup.remove_service(id).await;
    Ok(Json(json!({ "deleted": id })))
}

// Districts

#[axum::debug_handler]
pub async fn list_districts(State(state): State<LookupCellState>) -> Result<Json<Value>, AppError> {
    let districts = state
        .store
        .list_districts()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(Json(json!(districts)))
}

#[axum::debug_handler]
pub async fn districts_by_province(
    State(state): State<LookupCellState>,
    Path(province): Path<String>,
) -> Result<Json<Value>, AppError> {
    let districts = state.lookup.districts_in_province(&province).await;
    Ok(Json(json!(districts)))
}

#[axum::debug_handler]
pub async fn list_provinces(State(state): State<LookupCellState>) -> Result<Json<Value>, AppError> {
    let provinces = state.lookup.provinces().await;
    Ok(Json(json!(provinces)))
}

#[axum::debug_handler]
pub async fn create_district(
    State(state): State<LookupCellState>,
    Json(request): Json<CreateDistrictRequest>,
) -> Result<Json<Value>, AppError> {
    let district = District {
        id: 0,
        name: request.name,
        province: request.province,
    };
    let saved = state
        .store
        .save_district(district)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    state.lookup.upsert_district(saved.clone()).await;
    Ok(Json(json!(saved)))
}

#[axum::debug_handler]
pub async fn delete_district(
    State(state): State<LookupCellState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state
        .store
        .delete_district(id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    Ok(Json(json!({ "deleted": id })))
}

// Branch-service associations

#[axum::debug_handler]
pub async fn list_branch_services(
    State(state): State<LookupCellState>,
) -> Result<Json<Value>, AppError> {
    let associations = state
        .store
        .list_branch_services()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    let mut views = Vec::with_capacity(associations.len());
    for association in &associations {
        views.push(to_view(&state.lookup, association).await);
    }
    Ok(Json(json!(views)))
}

#[axum::debug_handler]
pub async fn get_branch_service(
    State(state): State<LookupCellState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let association = state
        .store
        .get_branch_service(id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?
        .ok_or_else(|| AppError::NotFound(format!("branch-service {} not found", id)))?;
    Ok(Json(json!(to_view(&state.lookup, &association).await)))
}

#[axum::debug_handler]
pub async fn branch_services_by_branch(
    State(state): State<LookupCellState>,
    Path(branch_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let ids = state.lookup.branch_service_ids_for_branch(branch_id).await;
    let associations = state
        .store
        .get_branch_services_by_ids(&ids)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    let mut views = Vec::with_capacity(associations.len());
    for association in &associations {
        views.push(to_view(&state.lookup, association).await);
    }
    Ok(Json(json!(views)))
}

#[axum::debug_handler]
pub async fn create_branch_service(
    State(state): State<LookupCellState>,
    Json(request): Json<CreateBranchServiceRequest>,
) -> Result<Json<Value>, AppError> {
    if state.lookup.branch(request.branch_id).await.is_none() {
        return Err(AppError::ValidationError(format!(
            "branch {} does not exist",
            request.branch_id
        )));
    }
    if state.lookup.service(request.service_id).await.is_none() {
        return Err(AppError::ValidationError(format!(
            "service {} does not exist",
            request.service_id
        )));
    }

    let association = BranchService {
        id: 0,
        branch_id: request.branch_id,
        service_id: request.service_id,
    };
    let saved = state
        .store
        .save_branch_service(association)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    if let Err(conflict) = state.lookup.upsert_branch_service(&saved).await {
        // Keep store and cache consistent when the pair was already taken.
        state
            .store
            .delete_branch_service(saved.id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        return Err(AppError::Conflict(conflict.to_string()));
    }

    Ok(Json(json!(to_view(&state.lookup, &saved).await)))
}

#[axum::debug_handler]
pub async fn delete_branch_service(
    State(state): State<LookupCellState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    state
        .store
        .delete_branch_service(id)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    state.lookup.remove_branch_service(id).await;
    Ok(Json(json!({ "deleted": id })))
}
