//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum, y el ensamblado de repositorios según el backend.

use std::sync::Arc;

use sqlx::PgPool;

use crate::cache::Cache;
use crate::config::environment::{EnvironmentConfig, StorageBackend};
use crate::jobs::MaintenanceCheckJob;
use crate::repositories::{
    DriverRepository, MaintenanceRecordRepository, MemoryStore, PgDriverRepository,
    PgMaintenanceRecordRepository, PgTripRepository, PgVehicleRepository, TripRepository,
    VehicleRepository,
};
use crate::services::{DriverService, MaintenanceService, TripService, VehicleService};

/// Implementaciones concretas de los cuatro repositorios
#[derive(Clone)]
pub struct Repositories {
    pub backend: StorageBackend,
    pub vehicles: Arc<dyn VehicleRepository>,
    pub drivers: Arc<dyn DriverRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub maintenance_records: Arc<dyn MaintenanceRecordRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            backend: StorageBackend::Postgres,
            vehicles: Arc::new(PgVehicleRepository::new(pool.clone())),
            drivers: Arc::new(PgDriverRepository::new(pool.clone())),
            trips: Arc::new(PgTripRepository::new(pool.clone())),
            maintenance_records: Arc::new(PgMaintenanceRecordRepository::new(pool)),
        }
    }

    pub fn in_memory(store: MemoryStore) -> Self {
        Self {
            backend: StorageBackend::Memory,
            vehicles: Arc::new(store.clone()),
            drivers: Arc::new(store.clone()),
            trips: Arc::new(store.clone()),
            maintenance_records: Arc::new(store),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub cache: Cache,
    pub storage_backend: StorageBackend,
    pub vehicle_service: VehicleService,
    pub driver_service: DriverService,
    pub trip_service: TripService,
    pub maintenance_service: MaintenanceService,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, repositories: &Repositories, cache: Cache) -> Self {
        Self {
            vehicle_service: VehicleService::new(repositories.vehicles.clone(), cache.clone()),
            driver_service: DriverService::new(
                repositories.drivers.clone(),
                repositories.trips.clone(),
                cache.clone(),
            ),
            trip_service: TripService::new(
                repositories.vehicles.clone(),
                repositories.drivers.clone(),
                repositories.trips.clone(),
                cache.clone(),
            ),
            maintenance_service: MaintenanceService::new(
                repositories.maintenance_records.clone(),
                repositories.vehicles.clone(),
                cache.clone(),
                config.maintenance.interval_days,
            ),
            storage_backend: repositories.backend,
            config,
            cache,
        }
    }

    /// Job de alertas de mantenimiento sobre los repositorios activos
    pub fn maintenance_check_job(&self, repositories: &Repositories) -> MaintenanceCheckJob {
        MaintenanceCheckJob::new(repositories.vehicles.clone())
    }
}
