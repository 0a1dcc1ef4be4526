//! Rutas HTTP
//!
//! Un router por recurso bajo `/api`, más `/health`. Las capas de trazado y CORS
//! se aplican al router completo.

pub mod driver_routes;
pub mod extractors;
pub mod maintenance_routes;
pub mod trip_routes;
pub mod vehicle_routes;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::compression::CompressionLayer;

use crate::config::environment::StorageBackend;
use crate::middleware::{cors_layer, trace_layer};
use crate::state::AppState;

/// Router completo de la API con el estado ya inyectado
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/api/drivers", driver_routes::create_driver_router())
        .nest("/api/trips", trip_routes::create_trip_router())
        .nest("/api/maintenance", maintenance_routes::create_maintenance_router())
        .layer(CompressionLayer::new())
        .layer(trace_layer())
        .layer(cors)
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let storage = match state.storage_backend {
        StorageBackend::Postgres => "postgres",
        StorageBackend::Memory => "memory",
    };

    Json(json!({
        "status": "ok",
        "environment": state.config.environment,
        "storage": storage,
        "cache": state.cache.backend_name(),
        "cacheConnected": state.cache.is_connected().await,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
