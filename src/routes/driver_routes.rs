use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use super::extractors::{Path, ValidatedJson};
use crate::dto::{CreateDriverRequest, DriverResponse, UpdateDriverRequest};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_driver_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_drivers).post(create_driver))
        .route("/available", get(list_available_drivers))
        .route(
            "/:id",
            get(get_driver).put(update_driver).delete(delete_driver),
        )
        .route("/:id/activate", post(activate_driver))
        .route("/:id/deactivate", post(deactivate_driver))
}

async fn create_driver(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateDriverRequest>,
) -> Result<(StatusCode, Json<DriverResponse>), AppError> {
    let response = state.driver_service.create(request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn get_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DriverResponse>, AppError> {
    Ok(Json(state.driver_service.get_by_id(id).await?))
}

async fn list_drivers(
    State(state): State<AppState>,
) -> Result<Json<Vec<DriverResponse>>, AppError> {
    Ok(Json(state.driver_service.get_all().await?))
}

async fn list_available_drivers(
    State(state): State<AppState>,
) -> Result<Json<Vec<DriverResponse>>, AppError> {
    Ok(Json(state.driver_service.get_available().await?))
}

async fn update_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateDriverRequest>,
) -> Result<Json<DriverResponse>, AppError> {
    Ok(Json(state.driver_service.update(id, request).await?))
}

async fn delete_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.driver_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn activate_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DriverResponse>, AppError> {
    Ok(Json(state.driver_service.activate(id).await?))
}

async fn deactivate_driver(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DriverResponse>, AppError> {
    Ok(Json(state.driver_service.deactivate(id).await?))
}
