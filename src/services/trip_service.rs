use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::cache::{Cache, DRIVERS_AVAILABLE_KEY, VEHICLES_AVAILABLE_KEY};
use crate::dto::{EndTripRequest, StartTripRequest, TripResponse};
use crate::models::{Trip, VehicleStatus};
use crate::repositories::{DriverRepository, TripRepository, VehicleRepository};
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Orquesta inicio y fin de viajes sobre vehículo, conductor y viaje.
///
/// Las dos escrituras de cada operación no comparten transacción: si la segunda
/// falla, la primera queda persistida.
#[derive(Clone)]
pub struct TripService {
    vehicles: Arc<dyn VehicleRepository>,
    drivers: Arc<dyn DriverRepository>,
    trips: Arc<dyn TripRepository>,
    cache: Cache,
}

impl TripService {
    pub fn new(
        vehicles: Arc<dyn VehicleRepository>,
        drivers: Arc<dyn DriverRepository>,
        trips: Arc<dyn TripRepository>,
        cache: Cache,
    ) -> Self {
        Self {
            vehicles,
            drivers,
            trips,
            cache,
        }
    }

    pub async fn start_trip(&self, request: StartTripRequest) -> AppResult<TripResponse> {
        let mut vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", request.vehicle_id))?;
        let driver = self
            .drivers
            .find_by_id(request.driver_id)
            .await?
            .ok_or_else(|| not_found_error("Driver", request.driver_id))?;

        if vehicle.status() != VehicleStatus::Available {
            return Err(AppError::InvalidOperation(format!(
                "Vehicle {} is not available. Current status: {}",
                vehicle.plate(),
                vehicle.status()
            )));
        }
        if !driver.is_active() {
            return Err(AppError::InvalidOperation(format!(
                "Driver {} is not active",
                driver.name()
            )));
        }
        if self.trips.has_active_trip_for_driver(driver.id()).await? {
            return Err(AppError::InvalidOperation(format!(
                "Driver {} is already on an active trip",
                driver.name()
            )));
        }

        let trip = Trip::new(vehicle.id(), driver.id(), &request.route, Utc::now())?;
        vehicle.start_trip()?;

        self.trips.add(&trip).await?;
        self.vehicles.update(&vehicle).await?;
        self.invalidate_availability().await;

        log::info!(
            "🚚 Viaje {} iniciado: vehículo {} con conductor {}",
            trip.id(),
            vehicle.plate(),
            driver.name()
        );
        Ok(TripResponse::from(&trip))
    }

    pub async fn end_trip(&self, trip_id: Uuid, request: EndTripRequest) -> AppResult<TripResponse> {
        let mut trip = self.find_trip(trip_id).await?;
        let mut vehicle = self
            .vehicles
            .find_by_id(trip.vehicle_id())
            .await?
            .ok_or_else(|| not_found_error("Vehicle", trip.vehicle_id()))?;

        trip.end(request.distance)?;
        vehicle.end_trip(request.distance)?;

        self.trips.update(&trip).await?;
        self.vehicles.update(&vehicle).await?;
        self.invalidate_availability().await;

        log::info!(
            "🏁 Viaje {} finalizado: {} km, vehículo {} en {} km",
            trip.id(),
            trip.distance(),
            vehicle.plate(),
            vehicle.mileage()
        );
        Ok(TripResponse::from(&trip))
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<TripResponse> {
        let trip = self.find_trip(id).await?;
        Ok(TripResponse::from(&trip))
    }

    pub async fn get_all(&self) -> AppResult<Vec<TripResponse>> {
        let trips = self.trips.find_all().await?;
        Ok(trips.iter().map(TripResponse::from).collect())
    }

    pub async fn get_active(&self) -> AppResult<Vec<TripResponse>> {
        let trips = self.trips.find_active().await?;
        Ok(trips.iter().map(TripResponse::from).collect())
    }

    async fn find_trip(&self, id: Uuid) -> AppResult<Trip> {
        self.trips
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Trip", id))
    }

    // Cambia el estado del vehículo y la disponibilidad del conductor
    async fn invalidate_availability(&self) {
        self.cache.invalidate(VEHICLES_AVAILABLE_KEY).await;
        self.cache.invalidate(DRIVERS_AVAILABLE_KEY).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Driver, Vehicle};
    use crate::repositories::MemoryStore;

    struct Fixture {
        store: MemoryStore,
        service: TripService,
    }

    impl Fixture {
        fn new() -> Self {
            let store = MemoryStore::new();
            let service = TripService::new(
                Arc::new(store.clone()),
                Arc::new(store.clone()),
                Arc::new(store.clone()),
                Cache::disabled(),
            );
            Self { store, service }
        }

        async fn vehicle(&self, plate: &str, mileage: i32) -> Vehicle {
            let vehicle = Vehicle::new(plate, "Sprinter", 2022, mileage, None).unwrap();
            VehicleRepository::add(&self.store, &vehicle).await.unwrap();
            vehicle
        }

        async fn driver(&self, license: &str) -> Driver {
            let driver = Driver::new("Ana Souza", license, "11999990000").unwrap();
            DriverRepository::add(&self.store, &driver).await.unwrap();
            driver
        }

        async fn stored_vehicle(&self, id: Uuid) -> Vehicle {
            VehicleRepository::find_by_id(&self.store, id)
                .await
                .unwrap()
                .unwrap()
        }

        async fn start(&self, vehicle: &Vehicle, driver: &Driver) -> AppResult<TripResponse> {
            self.service
                .start_trip(StartTripRequest {
                    vehicle_id: vehicle.id(),
                    driver_id: driver.id(),
                    route: "Centro -> Aeroporto".to_string(),
                })
                .await
        }
    }

    #[tokio::test]
    async fn test_start_and_end_trip_updates_vehicle() {
        let f = Fixture::new();
        let vehicle = f.vehicle("ABC1234", 1000).await;
        let driver = f.driver("LIC-1").await;

        let trip = f.start(&vehicle, &driver).await.unwrap();
        assert!(trip.end_date.is_none());
        assert_eq!(f.stored_vehicle(vehicle.id()).await.status(), VehicleStatus::InUse);

        let ended = f
            .service
            .end_trip(trip.id, EndTripRequest { distance: 150 })
            .await
            .unwrap();
        assert_eq!(ended.distance, 150);
        assert!(ended.end_date.is_some());

        let stored = f.stored_vehicle(vehicle.id()).await;
        assert_eq!(stored.status(), VehicleStatus::Available);
        assert_eq!(stored.mileage(), 1150);
    }

    #[tokio::test]
    async fn test_driver_on_active_trip_cannot_start_another() {
        let f = Fixture::new();
        let first = f.vehicle("ABC1234", 0).await;
        let second = f.vehicle("XYZ9876", 0).await;
        let driver = f.driver("LIC-1").await;

        f.start(&first, &driver).await.unwrap();
        let result = f.start(&second, &driver).await;

        assert!(matches!(result, Err(AppError::InvalidOperation(_))));
        assert_eq!(f.stored_vehicle(second.id()).await.status(), VehicleStatus::Available);
    }

    #[tokio::test]
    async fn test_vehicle_in_use_cannot_start_trip() {
        let f = Fixture::new();
        let vehicle = f.vehicle("ABC1234", 0).await;
        let first = f.driver("LIC-1").await;
        let second = f.driver("LIC-2").await;

        f.start(&vehicle, &first).await.unwrap();
        let result = f.start(&vehicle, &second).await;
        assert!(matches!(result, Err(AppError::InvalidOperation(_))));
    }

    #[tokio::test]
    async fn test_inactive_driver_cannot_start_trip() {
        let f = Fixture::new();
        let vehicle = f.vehicle("ABC1234", 0).await;
        let mut driver = f.driver("LIC-1").await;
        driver.deactivate();
        DriverRepository::update(&f.store, &driver).await.unwrap();

        let result = f.start(&vehicle, &driver).await;
        assert!(matches!(result, Err(AppError::InvalidOperation(_))));
    }

    #[tokio::test]
    async fn test_missing_vehicle_or_driver_is_not_found() {
        let f = Fixture::new();
        let vehicle = f.vehicle("ABC1234", 0).await;
        let driver = f.driver("LIC-1").await;
        let ghost_vehicle = Vehicle::new("GHOST01", "Sprinter", 2022, 0, None).unwrap();
        let ghost_driver = Driver::new("Nobody", "LIC-X", "11999990000").unwrap();

        assert!(matches!(
            f.start(&ghost_vehicle, &driver).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            f.start(&vehicle, &ghost_driver).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_end_trip_twice_or_negative_fails() {
        let f = Fixture::new();
        let vehicle = f.vehicle("ABC1234", 1000).await;
        let driver = f.driver("LIC-1").await;
        let trip = f.start(&vehicle, &driver).await.unwrap();

        let negative = f
            .service
            .end_trip(trip.id, EndTripRequest { distance: -1 })
            .await;
        assert!(matches!(negative, Err(AppError::InvalidArgument(_))));
        assert!(f.service.get_by_id(trip.id).await.unwrap().end_date.is_none());

        f.service
            .end_trip(trip.id, EndTripRequest { distance: 10 })
            .await
            .unwrap();
        let again = f
            .service
            .end_trip(trip.id, EndTripRequest { distance: 10 })
            .await;
        assert!(matches!(again, Err(AppError::InvalidOperation(_))));
        assert_eq!(f.stored_vehicle(vehicle.id()).await.mileage(), 1010);
    }

    #[tokio::test]
    async fn test_active_trips_listing() {
        let f = Fixture::new();
        let vehicle = f.vehicle("ABC1234", 0).await;
        let driver = f.driver("LIC-1").await;
        let trip = f.start(&vehicle, &driver).await.unwrap();

        assert_eq!(f.service.get_active().await.unwrap().len(), 1);
        f.service
            .end_trip(trip.id, EndTripRequest { distance: 5 })
            .await
            .unwrap();
        assert!(f.service.get_active().await.unwrap().is_empty());
        assert_eq!(f.service.get_all().await.unwrap().len(), 1);
    }
}
