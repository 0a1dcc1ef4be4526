use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::{Vehicle, VehicleStatus};
use crate::utils::validation::{validate_not_blank, validate_vehicle_year, PLATE_REGEX};

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVehicleRequest {
    #[validate(
        length(min = 1, max = 10),
        regex(path = "PLATE_REGEX", message = "Plate may only contain letters, digits and dashes")
    )]
    pub plate: String,
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub model: String,
    #[validate(custom = "validate_vehicle_year")]
    pub year: i32,
    #[validate(range(min = 0))]
    pub mileage: i32,
    /// Sin valor se toma la fecha actual
    pub last_maintenance_date: Option<DateTime<Utc>>,
}

// Request para actualizar un vehículo
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVehicleRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub model: String,
    #[validate(custom = "validate_vehicle_year")]
    pub year: i32,
    #[validate(range(min = 0))]
    pub mileage: i32,
}

// Response de vehículo (también es el formato guardado en cache)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleResponse {
    pub id: Uuid,
    pub plate: String,
    pub model: String,
    pub year: i32,
    pub mileage: i32,
    pub last_maintenance_date: DateTime<Utc>,
    pub next_maintenance_date: DateTime<Utc>,
    pub status: VehicleStatus,
}

impl From<&Vehicle> for VehicleResponse {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            id: vehicle.id(),
            plate: vehicle.plate().to_string(),
            model: vehicle.model().to_string(),
            year: vehicle.year(),
            mileage: vehicle.mileage(),
            last_maintenance_date: vehicle.last_maintenance_date(),
            next_maintenance_date: vehicle.next_maintenance_date(),
            status: vehicle.status(),
        }
    }
}
