use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{BranchActivityQuery, PeakGrouping, PeakTimesQuery, ServiceActivityQuery};
use crate::services::AnalyticsService;
use crate::AnalyticsCellState;

/// Parses a `YYYY-MM-DD_to_YYYY-MM-DD` period string.
fn parse_period(raw: &str) -> Result<(NaiveDate, NaiveDate), AppError> {
    let invalid = || {
        AppError::BadRequest(format!(
            "period '{}' is not of the form YYYY-MM-DD_to_YYYY-MM-DD",
            raw
        ))
    };
    let (start, end) = raw.split_once("_to_").ok_or_else(invalid)?;
    let start = start.parse().map_err(|_| invalid())?;
    let end = end.parse().map_err(|_| invalid())?;
    Ok((start, end))
}

fn analytics(state: &AnalyticsCellState) -> AnalyticsService {
    AnalyticsService::new(state.store.clone(), state.lookup.clone())
}

#[axum::debug_handler]
pub async fn appointments_by_branch(
    State(state): State<AnalyticsCellState>,
    Query(query): Query<BranchActivityQuery>,
) -> Result<Json<Value>, AppError> {
    let (start, end) = parse_period(&query.period)?;
    let report = analytics(&state)
        .branch_activity(query.branch_id, start, end)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!(report)))
}

#[axum::debug_handler]
pub async fn appointments_by_service(
    State(state): State<AnalyticsCellState>,
    Query(query): Query<ServiceActivityQuery>,
) -> Result<Json<Value>, AppError> {
    let (start, end) = parse_period(&query.period)?;
    let report = analytics(&state)
        .service_activity(&query.district, query.service_id, start, end)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!(report)))
}

#[axum::debug_handler]
pub async fn peak_times(
    State(state): State<AnalyticsCellState>,
    Query(query): Query<PeakTimesQuery>,
) -> Result<Json<Value>, AppError> {
    let (start, end) = parse_period(&query.period)?;
    let group_by: PeakGrouping = query
        .group_by
        .parse()
        .map_err(|e: String| AppError::BadRequest(e))?;

    let report = analytics(&state)
        .peak_times(
            query.district.as_deref(),
            query.branch_id,
            query.service_id,
            start,
            end,
            group_by,
        )
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(json!(report)))
}
