use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use super::extractors::{Path, ValidatedJson};
use crate::dto::{EndTripRequest, StartTripRequest, TripResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_trip_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_trips))
        .route("/active", get(list_active_trips))
        .route("/start", post(start_trip))
        .route("/end/:id", post(end_trip))
        .route("/:id", get(get_trip))
}

async fn start_trip(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<StartTripRequest>,
) -> Result<(StatusCode, Json<TripResponse>), AppError> {
    let response = state.trip_service.start_trip(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn end_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<EndTripRequest>,
) -> Result<Json<TripResponse>, AppError> {
    Ok(Json(state.trip_service.end_trip(id, request).await?))
}

async fn get_trip(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TripResponse>, AppError> {
    Ok(Json(state.trip_service.get_by_id(id).await?))
}

async fn list_trips(State(state): State<AppState>) -> Result<Json<Vec<TripResponse>>, AppError> {
    Ok(Json(state.trip_service.get_all().await?))
}

async fn list_active_trips(
    State(state): State<AppState>,
) -> Result<Json<Vec<TripResponse>>, AppError> {
    Ok(Json(state.trip_service.get_active().await?))
}
