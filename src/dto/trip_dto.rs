use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Trip;
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct StartTripRequest {
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub route: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EndTripRequest {
    /// Kilómetros recorridos
    #[validate(range(min = 0))]
    pub distance: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub route: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub distance: i32,
}

impl From<&Trip> for TripResponse {
    fn from(trip: &Trip) -> Self {
        Self {
            id: trip.id(),
            vehicle_id: trip.vehicle_id(),
            driver_id: trip.driver_id(),
            route: trip.route().to_string(),
            start_date: trip.start_date(),
            end_date: trip.end_date(),
            distance: trip.distance(),
        }
    }
}
