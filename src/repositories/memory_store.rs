//! Almacenamiento en memoria
//!
//! Implementa los cuatro repositorios sobre un único conjunto de tablas protegido por
//! un `RwLock`, replicando las restricciones del esquema PostgreSQL: placa y licencia
//! únicas, borrado en cascada de mantenimientos y borrado restringido de vehículos y
//! conductores con viajes. Se selecciona con `STORAGE_BACKEND=memory` y lo usan los tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DriverRepository, MaintenanceRecordRepository, TripRepository, VehicleRepository};
use crate::models::{Driver, MaintenanceRecord, Trip, Vehicle, VehicleStatus};
use crate::utils::errors::{conflict_error, not_found_error, AppError, AppResult};

#[derive(Default)]
struct Tables {
    vehicles: HashMap<Uuid, Vehicle>,
    drivers: HashMap<Uuid, Driver>,
    trips: HashMap<Uuid, Trip>,
    maintenance_records: HashMap<Uuid, MaintenanceRecord>,
}

impl Tables {
    fn driver_has_active_trip(&self, driver_id: Uuid) -> bool {
        self.trips
            .values()
            .any(|t| t.driver_id() == driver_id && t.is_active())
    }
}

/// Clonable: todos los clones comparten las mismas tablas
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn sorted_by_plate(mut vehicles: Vec<Vehicle>) -> Vec<Vehicle> {
    vehicles.sort_by(|a, b| a.plate().cmp(b.plate()));
    vehicles
}

fn sorted_by_name(mut drivers: Vec<Driver>) -> Vec<Driver> {
    drivers.sort_by(|a, b| a.name().cmp(b.name()));
    drivers
}

fn newest_first(mut trips: Vec<Trip>) -> Vec<Trip> {
    trips.sort_by(|a, b| b.start_date().cmp(&a.start_date()));
    trips
}

#[async_trait]
impl VehicleRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        Ok(self.tables.read().await.vehicles.get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Vehicle>> {
        let tables = self.tables.read().await;
        Ok(sorted_by_plate(tables.vehicles.values().cloned().collect()))
    }

    async fn find_available(&self) -> AppResult<Vec<Vehicle>> {
        let tables = self.tables.read().await;
        Ok(sorted_by_plate(
            tables
                .vehicles
                .values()
                .filter(|v| v.status() == VehicleStatus::Available)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_plate(&self, plate: &str) -> AppResult<Option<Vehicle>> {
        let tables = self.tables.read().await;
        Ok(tables.vehicles.values().find(|v| v.plate() == plate).cloned())
    }

    async fn find_with_upcoming_maintenance(
        &self,
        threshold_date: DateTime<Utc>,
    ) -> AppResult<Vec<Vehicle>> {
        let tables = self.tables.read().await;
        let mut vehicles: Vec<Vehicle> = tables
            .vehicles
            .values()
            .filter(|v| v.next_maintenance_date() <= threshold_date)
            .cloned()
            .collect();
        vehicles.sort_by_key(|v| v.next_maintenance_date());
        Ok(vehicles)
    }

    async fn add(&self, vehicle: &Vehicle) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables.vehicles.values().any(|v| v.plate() == vehicle.plate()) {
            return Err(conflict_error("Vehicle", "Plate", vehicle.plate()));
        }
        tables.vehicles.insert(vehicle.id(), vehicle.clone());
        Ok(())
    }

    async fn update(&self, vehicle: &Vehicle) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.vehicles.contains_key(&vehicle.id()) {
            return Err(not_found_error("Vehicle", vehicle.id()));
        }
        if tables
            .vehicles
            .values()
            .any(|v| v.id() != vehicle.id() && v.plate() == vehicle.plate())
        {
            return Err(conflict_error("Vehicle", "Plate", vehicle.plate()));
        }
        tables.vehicles.insert(vehicle.id(), vehicle.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.vehicles.contains_key(&id) {
            return Ok(false);
        }
        if tables.trips.values().any(|t| t.vehicle_id() == id) {
            return Err(AppError::InvalidOperation(
                "Error deleting vehicle: the record is still referenced by other records"
                    .to_string(),
            ));
        }
        tables.maintenance_records.retain(|_, r| r.vehicle_id() != id);
        tables.vehicles.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl DriverRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>> {
        Ok(self.tables.read().await.drivers.get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Driver>> {
        let tables = self.tables.read().await;
        Ok(sorted_by_name(tables.drivers.values().cloned().collect()))
    }

    async fn find_available(&self) -> AppResult<Vec<Driver>> {
        let tables = self.tables.read().await;
        Ok(sorted_by_name(
            tables
                .drivers
                .values()
                .filter(|d| d.is_available(tables.driver_has_active_trip(d.id())))
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_license_number(&self, license_number: &str) -> AppResult<Option<Driver>> {
        let tables = self.tables.read().await;
        Ok(tables
            .drivers
            .values()
            .find(|d| d.license_number() == license_number)
            .cloned())
    }

    async fn add(&self, driver: &Driver) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if tables
            .drivers
            .values()
            .any(|d| d.license_number() == driver.license_number())
        {
            return Err(conflict_error(
                "Driver",
                "LicenseNumber",
                driver.license_number(),
            ));
        }
        tables.drivers.insert(driver.id(), driver.clone());
        Ok(())
    }

    async fn update(&self, driver: &Driver) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.drivers.contains_key(&driver.id()) {
            return Err(not_found_error("Driver", driver.id()));
        }
        tables.drivers.insert(driver.id(), driver.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut tables = self.tables.write().await;
        if !tables.drivers.contains_key(&id) {
            return Ok(false);
        }
        if tables.trips.values().any(|t| t.driver_id() == id) {
            return Err(AppError::InvalidOperation(
                "Error deleting driver: the record is still referenced by other records"
                    .to_string(),
            ));
        }
        tables.drivers.remove(&id);
        Ok(true)
    }
}

#[async_trait]
impl TripRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Trip>> {
        Ok(self.tables.read().await.trips.get(&id).cloned())
    }

    async fn find_all(&self) -> AppResult<Vec<Trip>> {
        let tables = self.tables.read().await;
        Ok(newest_first(tables.trips.values().cloned().collect()))
    }

    async fn find_active(&self) -> AppResult<Vec<Trip>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables.trips.values().filter(|t| t.is_active()).cloned().collect(),
        ))
    }

    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<Trip>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .trips
                .values()
                .filter(|t| t.vehicle_id() == vehicle_id)
                .cloned()
                .collect(),
        ))
    }

    async fn find_by_driver(&self, driver_id: Uuid) -> AppResult<Vec<Trip>> {
        let tables = self.tables.read().await;
        Ok(newest_first(
            tables
                .trips
                .values()
                .filter(|t| t.driver_id() == driver_id)
                .cloned()
                .collect(),
        ))
    }

    async fn has_active_trip_for_driver(&self, driver_id: Uuid) -> AppResult<bool> {
        Ok(self.tables.read().await.driver_has_active_trip(driver_id))
    }

    async fn add(&self, trip: &Trip) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.vehicles.contains_key(&trip.vehicle_id())
            || !tables.drivers.contains_key(&trip.driver_id())
        {
            return Err(AppError::InvalidOperation(
                "Error creating trip: referenced vehicle or driver does not exist".to_string(),
            ));
        }
        tables.trips.insert(trip.id(), trip.clone());
        Ok(())
    }

    async fn update(&self, trip: &Trip) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.trips.contains_key(&trip.id()) {
            return Err(not_found_error("Trip", trip.id()));
        }
        tables.trips.insert(trip.id(), trip.clone());
        Ok(())
    }
}

#[async_trait]
impl MaintenanceRecordRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceRecord>> {
        Ok(self.tables.read().await.maintenance_records.get(&id).cloned())
    }

    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceRecord>> {
        let tables = self.tables.read().await;
        let mut records: Vec<MaintenanceRecord> = tables
            .maintenance_records
            .values()
            .filter(|r| r.vehicle_id() == vehicle_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date().cmp(&a.date()));
        Ok(records)
    }

    async fn add(&self, record: &MaintenanceRecord) -> AppResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.vehicles.contains_key(&record.vehicle_id()) {
            return Err(AppError::InvalidOperation(
                "Error creating maintenance record: referenced vehicle does not exist"
                    .to_string(),
            ));
        }
        tables.maintenance_records.insert(record.id(), record.clone());
        Ok(())
    }
}
