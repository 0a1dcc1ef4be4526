use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use super::extractors::{Path, Query, ValidatedJson};
use crate::dto::{
    CreateMaintenanceRecordRequest, MaintenanceRecordResponse, UpcomingMaintenanceQuery,
    VehicleResponse,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Umbral por defecto de `/upcoming` cuando no llega `daysThreshold`
const DEFAULT_UPCOMING_DAYS: i32 = 7;

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_maintenance_record))
        .route("/vehicle/:id", get(list_vehicle_maintenance))
        .route("/upcoming", get(list_upcoming_maintenance))
}

async fn create_maintenance_record(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateMaintenanceRecordRequest>,
) -> Result<(StatusCode, Json<MaintenanceRecordResponse>), AppError> {
    let response = state.maintenance_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn list_vehicle_maintenance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MaintenanceRecordResponse>>, AppError> {
    Ok(Json(state.maintenance_service.get_by_vehicle(id).await?))
}

async fn list_upcoming_maintenance(
    State(state): State<AppState>,
    Query(query): Query<UpcomingMaintenanceQuery>,
) -> Result<Json<Vec<VehicleResponse>>, AppError> {
    let days = query.days_threshold.unwrap_or(DEFAULT_UPCOMING_DAYS);
    Ok(Json(
        state.vehicle_service.get_upcoming_maintenance(days).await?,
    ))
}
