//! Repositorios
//!
//! Contratos de acceso a datos por entidad. Hay dos implementaciones:
//! PostgreSQL (`Pg*Repository`, sqlx) y `MemoryStore` (tablas en memoria
//! con las mismas reglas relacionales).

pub mod driver_repository;
pub mod maintenance_record_repository;
pub mod memory_store;
pub mod trip_repository;
pub mod vehicle_repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Driver, MaintenanceRecord, Trip, Vehicle};
use crate::utils::errors::{AppError, AppResult};

pub use driver_repository::PgDriverRepository;
pub use maintenance_record_repository::PgMaintenanceRecordRepository;
pub use memory_store::MemoryStore;
pub use trip_repository::PgTripRepository;
pub use vehicle_repository::PgVehicleRepository;

#[async_trait]
pub trait VehicleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>>;
    async fn find_all(&self) -> AppResult<Vec<Vehicle>>;
    async fn find_available(&self) -> AppResult<Vec<Vehicle>>;
    async fn find_by_plate(&self, plate: &str) -> AppResult<Option<Vehicle>>;
    /// Vehículos con `next_maintenance_date <= threshold_date`
    async fn find_with_upcoming_maintenance(
        &self,
        threshold_date: DateTime<Utc>,
    ) -> AppResult<Vec<Vehicle>>;
    async fn add(&self, vehicle: &Vehicle) -> AppResult<()>;
    async fn update(&self, vehicle: &Vehicle) -> AppResult<()>;
    /// Devuelve `false` si no existía. Borra en cascada los registros de mantenimiento.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait DriverRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>>;
    async fn find_all(&self) -> AppResult<Vec<Driver>>;
    /// Activos y sin viaje abierto, resuelto en el almacenamiento
    async fn find_available(&self) -> AppResult<Vec<Driver>>;
    async fn find_by_license_number(&self, license_number: &str) -> AppResult<Option<Driver>>;
    async fn add(&self, driver: &Driver) -> AppResult<()>;
    async fn update(&self, driver: &Driver) -> AppResult<()>;
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait TripRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Trip>>;
    /// Más recientes primero
    async fn find_all(&self) -> AppResult<Vec<Trip>>;
    async fn find_active(&self) -> AppResult<Vec<Trip>>;
    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<Trip>>;
    async fn find_by_driver(&self, driver_id: Uuid) -> AppResult<Vec<Trip>>;
    async fn has_active_trip_for_driver(&self, driver_id: Uuid) -> AppResult<bool>;
    async fn add(&self, trip: &Trip) -> AppResult<()>;
    async fn update(&self, trip: &Trip) -> AppResult<()>;
}

#[async_trait]
pub trait MaintenanceRecordRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceRecord>>;
    /// Más recientes primero
    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceRecord>>;
    async fn add(&self, record: &MaintenanceRecord) -> AppResult<()>;
}

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Traducir errores de PostgreSQL a la taxonomía de la aplicación
pub(crate) fn map_db_error(context: &str, error: sqlx::Error) -> AppError {
    if let Some(db_error) = error.as_database_error() {
        match db_error.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                return AppError::Conflict(format!("{}: {}", context, db_error.message()));
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                return AppError::InvalidOperation(format!(
                    "{}: the record is still referenced by other records",
                    context
                ));
            }
            _ => {}
        }
    }
    log::error!("❌ {}: {}", context, error);
    AppError::Database(error)
}
