use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::cache::{Cache, DRIVERS_AVAILABLE_KEY};
use crate::dto::{CreateDriverRequest, DriverResponse, UpdateDriverRequest};
use crate::models::Driver;
use crate::repositories::{DriverRepository, TripRepository};
use crate::utils::errors::{conflict_error, not_found_error, AppResult};

/// Gestión de conductores. La disponibilidad se calcula con una consulta
/// explícita de viajes abiertos, nunca cargando el historial del conductor.
#[derive(Clone)]
pub struct DriverService {
    drivers: Arc<dyn DriverRepository>,
    trips: Arc<dyn TripRepository>,
    cache: Cache,
}

impl DriverService {
    pub fn new(
        drivers: Arc<dyn DriverRepository>,
        trips: Arc<dyn TripRepository>,
        cache: Cache,
    ) -> Self {
        Self {
            drivers,
            trips,
            cache,
        }
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<DriverResponse> {
        let driver = self.find_driver(id).await?;
        self.to_response(&driver).await
    }

    pub async fn get_all(&self) -> AppResult<Vec<DriverResponse>> {
        let drivers = self.drivers.find_all().await?;
        let busy: HashSet<Uuid> = self
            .trips
            .find_active()
            .await?
            .iter()
            .map(|trip| trip.driver_id())
            .collect();

        Ok(drivers
            .iter()
            .map(|d| DriverResponse::from_driver(d, busy.contains(&d.id())))
            .collect())
    }

    pub async fn get_available(&self) -> AppResult<Vec<DriverResponse>> {
        if let Some(cached) = self
            .cache
            .get::<Vec<DriverResponse>>(DRIVERS_AVAILABLE_KEY)
            .await
        {
            return Ok(cached);
        }

        // El repositorio ya filtra los que tienen viaje abierto
        let drivers = self.drivers.find_available().await?;
        let response: Vec<DriverResponse> = drivers
            .iter()
            .map(|d| DriverResponse::from_driver(d, false))
            .collect();
        self.cache.set(DRIVERS_AVAILABLE_KEY, &response).await;
        Ok(response)
    }

    pub async fn create(&self, request: CreateDriverRequest) -> AppResult<DriverResponse> {
        let license_number = request.license_number.trim();
        if self
            .drivers
            .find_by_license_number(license_number)
            .await?
            .is_some()
        {
            return Err(conflict_error("Driver", "LicenseNumber", license_number));
        }

        let driver = Driver::new(&request.name, license_number, &request.phone)?;
        self.drivers.add(&driver).await?;
        self.cache.invalidate(DRIVERS_AVAILABLE_KEY).await;

        log::info!("👤 Conductor creado: {} ({})", driver.name(), driver.id());
        Ok(DriverResponse::from_driver(&driver, false))
    }

    pub async fn update(&self, id: Uuid, request: UpdateDriverRequest) -> AppResult<DriverResponse> {
        let mut driver = self.find_driver(id).await?;
        driver.update_info(&request.name, &request.phone)?;

        self.drivers.update(&driver).await?;
        self.cache.invalidate(DRIVERS_AVAILABLE_KEY).await;

        log::info!("✏️ Conductor actualizado: {}", id);
        self.to_response(&driver).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.drivers.delete(id).await? {
            return Err(not_found_error("Driver", id));
        }
        self.cache.invalidate(DRIVERS_AVAILABLE_KEY).await;

        log::info!("🗑️ Conductor eliminado: {}", id);
        Ok(())
    }

    pub async fn activate(&self, id: Uuid) -> AppResult<DriverResponse> {
        self.set_active(id, true).await
    }

    pub async fn deactivate(&self, id: Uuid) -> AppResult<DriverResponse> {
        self.set_active(id, false).await
    }

    async fn set_active(&self, id: Uuid, active: bool) -> AppResult<DriverResponse> {
        let mut driver = self.find_driver(id).await?;
        if active {
            driver.activate();
        } else {
            driver.deactivate();
        }

        self.drivers.update(&driver).await?;
        self.cache.invalidate(DRIVERS_AVAILABLE_KEY).await;

        log::info!(
            "🔄 Conductor {} {}",
            id,
            if active { "activado" } else { "desactivado" }
        );
        self.to_response(&driver).await
    }

    async fn to_response(&self, driver: &Driver) -> AppResult<DriverResponse> {
        let has_active_trip = self.trips.has_active_trip_for_driver(driver.id()).await?;
        Ok(DriverResponse::from_driver(driver, has_active_trip))
    }

    async fn find_driver(&self, id: Uuid) -> AppResult<Driver> {
        self.drivers
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Driver", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Trip, Vehicle};
    use crate::repositories::{MemoryStore, VehicleRepository};
    use crate::utils::errors::AppError;
    use chrono::Utc;

    fn service(store: &MemoryStore) -> DriverService {
        DriverService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Cache::disabled(),
        )
    }

    fn create_request(license: &str) -> CreateDriverRequest {
        CreateDriverRequest {
            name: "Ana Souza".to_string(),
            license_number: license.to_string(),
            phone: "11999990000".to_string(),
        }
    }

    #[tokio::test]
    async fn test_duplicate_license_is_conflict() {
        let store = MemoryStore::new();
        let service = service(&store);
        service.create(create_request("LIC-1")).await.unwrap();

        let result = service.create(create_request("LIC-1")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_deactivate_and_activate() {
        let store = MemoryStore::new();
        let service = service(&store);
        let created = service.create(create_request("LIC-1")).await.unwrap();
        assert!(created.available);

        let deactivated = service.deactivate(created.id).await.unwrap();
        assert!(!deactivated.active);
        assert!(!deactivated.available);
        assert!(service.get_available().await.unwrap().is_empty());

        let activated = service.activate(created.id).await.unwrap();
        assert!(activated.active && activated.available);
    }

    #[tokio::test]
    async fn test_driver_with_open_trip_is_never_available() {
        let store = MemoryStore::new();
        let service = service(&store);
        let created = service.create(create_request("LIC-1")).await.unwrap();
        let vehicle = Vehicle::new("ABC1234", "Sprinter", 2022, 0, None).unwrap();
        VehicleRepository::add(&store, &vehicle).await.unwrap();
        let mut trip = Trip::new(vehicle.id(), created.id, "Centro -> Porto", Utc::now()).unwrap();
        TripRepository::add(&store, &trip).await.unwrap();

        assert!(!service.get_by_id(created.id).await.unwrap().available);
        assert!(!service.get_all().await.unwrap()[0].available);
        assert!(!service.activate(created.id).await.unwrap().available);

        trip.end(10).unwrap();
        TripRepository::update(&store, &trip).await.unwrap();
        assert!(service.get_by_id(created.id).await.unwrap().available);
    }

    #[tokio::test]
    async fn test_update_keeps_license() {
        let store = MemoryStore::new();
        let service = service(&store);
        let created = service.create(create_request("LIC-1")).await.unwrap();

        let updated = service
            .update(
                created.id,
                UpdateDriverRequest {
                    name: "Ana S. Lima".to_string(),
                    phone: "11888880000".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Ana S. Lima");
        assert_eq!(updated.license_number, "LIC-1");
    }

    #[tokio::test]
    async fn test_missing_driver_is_not_found() {
        let store = MemoryStore::new();
        let service = service(&store);
        assert!(matches!(
            service.activate(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }
}
