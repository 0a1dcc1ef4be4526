//! Modelo de Trip
//!
//! `Active` (sin fecha de fin) -> `Ended` (terminal).

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::errors::{invalid_argument, invalid_operation, require_not_blank, DomainResult};

pub const ROUTE_MAX_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    id: Uuid,
    vehicle_id: Uuid,
    driver_id: Uuid,
    route: String,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    distance: i32,
}

impl Trip {
    pub fn new(
        vehicle_id: Uuid,
        driver_id: Uuid,
        route: &str,
        start_date: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if vehicle_id.is_nil() {
            return Err(invalid_argument("Vehicle ID cannot be empty"));
        }
        if driver_id.is_nil() {
            return Err(invalid_argument("Driver ID cannot be empty"));
        }
        require_not_blank(route, "Route")?;

        Ok(Self {
            id: Uuid::new_v4(),
            vehicle_id,
            driver_id,
            route: route.trim().to_string(),
            start_date,
            end_date: None,
            distance: 0,
        })
    }

    pub fn restore(
        id: Uuid,
        vehicle_id: Uuid,
        driver_id: Uuid,
        route: String,
        start_date: DateTime<Utc>,
        end_date: Option<DateTime<Utc>>,
        distance: i32,
    ) -> Self {
        Self {
            id,
            vehicle_id,
            driver_id,
            route,
            start_date,
            end_date,
            distance,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn vehicle_id(&self) -> Uuid {
        self.vehicle_id
    }

    pub fn driver_id(&self) -> Uuid {
        self.driver_id
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    pub fn distance(&self) -> i32 {
        self.distance
    }

    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }

    pub fn end(&mut self, distance: i32) -> DomainResult<()> {
        self.end_at(distance, Utc::now())
    }

    /// Cerrar el viaje. Ambas comprobaciones ocurren antes de mutar nada.
    pub fn end_at(&mut self, distance: i32, ended_at: DateTime<Utc>) -> DomainResult<()> {
        if self.end_date.is_some() {
            return Err(invalid_operation("Trip has already been ended"));
        }
        if distance < 0 {
            return Err(invalid_argument("Distance cannot be negative"));
        }

        self.end_date = Some(ended_at);
        self.distance = distance;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::DomainError;

    fn trip() -> Trip {
        Trip::new(Uuid::new_v4(), Uuid::new_v4(), "São Paulo -> Campinas", Utc::now()).unwrap()
    }

    #[test]
    fn test_new_trip_is_active_with_zero_distance() {
        let trip = trip();
        assert!(trip.is_active());
        assert_eq!(trip.distance(), 0);
        assert!(trip.end_date().is_none());
    }

    #[test]
    fn test_new_trip_validation() {
        assert!(Trip::new(Uuid::nil(), Uuid::new_v4(), "route", Utc::now()).is_err());
        assert!(Trip::new(Uuid::new_v4(), Uuid::nil(), "route", Utc::now()).is_err());
        assert!(Trip::new(Uuid::new_v4(), Uuid::new_v4(), " ", Utc::now()).is_err());
    }

    #[test]
    fn test_end_sets_end_date_and_distance() {
        let mut trip = trip();
        let ended_at = Utc::now();
        trip.end_at(120, ended_at).unwrap();

        assert!(!trip.is_active());
        assert_eq!(trip.end_date(), Some(ended_at));
        assert_eq!(trip.distance(), 120);
    }

    #[test]
    fn test_cannot_end_twice() {
        let mut trip = trip();
        trip.end(10).unwrap();
        assert!(matches!(trip.end(20), Err(DomainError::InvalidOperation(_))));
        assert_eq!(trip.distance(), 10);
    }

    #[test]
    fn test_negative_distance_does_not_mutate() {
        let mut trip = trip();
        assert!(matches!(trip.end(-1), Err(DomainError::InvalidArgument(_))));
        assert!(trip.is_active());
        assert_eq!(trip.distance(), 0);
    }
}
