use std::sync::Arc;

use uuid::Uuid;

use crate::cache::{Cache, VEHICLES_AVAILABLE_KEY};
use crate::dto::{CreateMaintenanceRecordRequest, MaintenanceRecordResponse};
use crate::models::MaintenanceRecord;
use crate::repositories::{MaintenanceRecordRepository, VehicleRepository};
use crate::utils::errors::{not_found_error, AppResult};

/// Registro de mantenimientos.
///
/// Registrar un mantenimiento lo da por completado en la misma operación: el vehículo
/// pasa por `InMaintenance` y vuelve a `Available` con la próxima fecha recalculada.
#[derive(Clone)]
pub struct MaintenanceService {
    records: Arc<dyn MaintenanceRecordRepository>,
    vehicles: Arc<dyn VehicleRepository>,
    cache: Cache,
    interval_days: i32,
}

impl MaintenanceService {
    pub fn new(
        records: Arc<dyn MaintenanceRecordRepository>,
        vehicles: Arc<dyn VehicleRepository>,
        cache: Cache,
        interval_days: i32,
    ) -> Self {
        Self {
            records,
            vehicles,
            cache,
            interval_days,
        }
    }

    pub async fn create(
        &self,
        request: CreateMaintenanceRecordRequest,
    ) -> AppResult<MaintenanceRecordResponse> {
        let mut vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", request.vehicle_id))?;

        let record = MaintenanceRecord::new(
            vehicle.id(),
            request.date,
            &request.description,
            request.cost,
        )?;

        // Transiciones antes de escribir: un vehículo en viaje no deja registro huérfano
        vehicle.start_maintenance()?;
        vehicle.complete_maintenance(request.date, self.interval_days)?;

        self.records.add(&record).await?;
        self.vehicles.update(&vehicle).await?;
        self.cache.invalidate(VEHICLES_AVAILABLE_KEY).await;

        log::info!(
            "🔧 Mantenimiento registrado para {}: próximo el {}",
            vehicle.plate(),
            vehicle.next_maintenance_date().format("%d/%m/%Y")
        );
        Ok(MaintenanceRecordResponse::from(&record))
    }

    pub async fn get_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceRecordResponse>> {
        if self.vehicles.find_by_id(vehicle_id).await?.is_none() {
            return Err(not_found_error("Vehicle", vehicle_id));
        }

        let records = self.records.find_by_vehicle(vehicle_id).await?;
        Ok(records.iter().map(MaintenanceRecordResponse::from).collect())
    }
}
