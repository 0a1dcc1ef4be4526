use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::cache::{Cache, VEHICLES_AVAILABLE_KEY};
use crate::dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::models::vehicle::maintenance_threshold_date;
use crate::models::Vehicle;
use crate::repositories::VehicleRepository;
use crate::utils::errors::{conflict_error, not_found_error, AppResult};

/// Alta, baja, consulta y modificación de vehículos
#[derive(Clone)]
pub struct VehicleService {
    vehicles: Arc<dyn VehicleRepository>,
    cache: Cache,
}

impl VehicleService {
    pub fn new(vehicles: Arc<dyn VehicleRepository>, cache: Cache) -> Self {
        Self { vehicles, cache }
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<VehicleResponse> {
        let vehicle = self.find_vehicle(id).await?;
        Ok(VehicleResponse::from(&vehicle))
    }

    pub async fn get_all(&self) -> AppResult<Vec<VehicleResponse>> {
        let vehicles = self.vehicles.find_all().await?;
        Ok(vehicles.iter().map(VehicleResponse::from).collect())
    }

    /// Listado de disponibles, servido desde cache cuando existe
    pub async fn get_available(&self) -> AppResult<Vec<VehicleResponse>> {
        if let Some(cached) = self
            .cache
            .get::<Vec<VehicleResponse>>(VEHICLES_AVAILABLE_KEY)
            .await
        {
            return Ok(cached);
        }

        let vehicles = self.vehicles.find_available().await?;
        let response: Vec<VehicleResponse> = vehicles.iter().map(VehicleResponse::from).collect();
        self.cache.set(VEHICLES_AVAILABLE_KEY, &response).await;
        Ok(response)
    }

    /// Vehículos con `next_maintenance_date <= ahora + days_threshold`
    pub async fn get_upcoming_maintenance(
        &self,
        days_threshold: i32,
    ) -> AppResult<Vec<VehicleResponse>> {
        let threshold_date = maintenance_threshold_date(days_threshold, Utc::now())?;
        let vehicles = self
            .vehicles
            .find_with_upcoming_maintenance(threshold_date)
            .await?;
        Ok(vehicles.iter().map(VehicleResponse::from).collect())
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<VehicleResponse> {
        let plate = request.plate.trim();
        if self.vehicles.find_by_plate(plate).await?.is_some() {
            return Err(conflict_error("Vehicle", "Plate", plate));
        }

        let vehicle = Vehicle::new(
            plate,
            &request.model,
            request.year,
            request.mileage,
            request.last_maintenance_date,
        )?;
        self.vehicles.add(&vehicle).await?;
        self.cache.invalidate(VEHICLES_AVAILABLE_KEY).await;

        log::info!("🚗 Vehículo creado: {} ({})", vehicle.plate(), vehicle.id());
        Ok(VehicleResponse::from(&vehicle))
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateVehicleRequest,
    ) -> AppResult<VehicleResponse> {
        let mut vehicle = self.find_vehicle(id).await?;

        vehicle.update_details(&request.model, request.year)?;
        vehicle.update_mileage(request.mileage)?;

        self.vehicles.update(&vehicle).await?;
        self.cache.invalidate(VEHICLES_AVAILABLE_KEY).await;

        log::info!("✏️ Vehículo actualizado: {}", vehicle.id());
        Ok(VehicleResponse::from(&vehicle))
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        if !self.vehicles.delete(id).await? {
            return Err(not_found_error("Vehicle", id));
        }
        self.cache.invalidate(VEHICLES_AVAILABLE_KEY).await;

        log::info!("🗑️ Vehículo eliminado: {}", id);
        Ok(())
    }

    async fn find_vehicle(&self, id: Uuid) -> AppResult<Vehicle> {
        self.vehicles
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::VehicleStatus;
    use crate::repositories::MemoryStore;
    use crate::utils::errors::AppError;
    use chrono::Duration;

    fn service() -> VehicleService {
        VehicleService::new(Arc::new(MemoryStore::new()), Cache::disabled())
    }

    fn create_request(plate: &str) -> CreateVehicleRequest {
        CreateVehicleRequest {
            plate: plate.to_string(),
            model: "Sprinter".to_string(),
            year: 2022,
            mileage: 1000,
            last_maintenance_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = service();
        let created = service.create(create_request("ABC1234")).await.unwrap();

        let fetched = service.get_by_id(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.status, VehicleStatus::Available);
        assert_eq!(fetched.next_maintenance_date, fetched.last_maintenance_date);
    }

    #[tokio::test]
    async fn test_duplicate_plate_is_conflict() {
        let service = service();
        service.create(create_request("ABC1234")).await.unwrap();

        let result = service.create(create_request("ABC1234")).await;
        match result {
            Err(AppError::Conflict(msg)) => {
                assert_eq!(msg, "Vehicle with Plate 'ABC1234' already exists")
            }
            other => panic!("expected conflict, got {:?}", other.map(|v| v.id)),
        }
    }

    #[tokio::test]
    async fn test_update_rejects_lower_mileage() {
        let service = service();
        let created = service.create(create_request("ABC1234")).await.unwrap();

        let result = service
            .update(
                created.id,
                UpdateVehicleRequest {
                    model: "Sprinter 2".to_string(),
                    year: 2023,
                    mileage: 500,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::InvalidArgument(_))));

        let updated = service
            .update(
                created.id,
                UpdateVehicleRequest {
                    model: "Sprinter 2".to_string(),
                    year: 2023,
                    mileage: 1500,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.mileage, 1500);
        assert_eq!(updated.model, "Sprinter 2");
    }

    #[tokio::test]
    async fn test_missing_vehicle_is_not_found() {
        let service = service();
        assert!(matches!(
            service.get_by_id(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.delete(Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_upcoming_maintenance() {
        let service = service();
        // Recién creado: vence hoy
        service.create(create_request("DUE0001")).await.unwrap();
        let mut later = create_request("LATE001");
        later.last_maintenance_date = Some(Utc::now() + Duration::days(30));
        service.create(later).await.unwrap();

        let upcoming = service.get_upcoming_maintenance(7).await.unwrap();
        assert_eq!(upcoming.len(), 1);
        assert_eq!(upcoming[0].plate, "DUE0001");

        assert!(matches!(
            service.get_upcoming_maintenance(-1).await,
            Err(AppError::InvalidArgument(_))
        ));
    }
}
