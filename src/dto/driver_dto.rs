use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::Driver;
use crate::utils::validation::{validate_not_blank, PHONE_REGEX};

// Request para registrar un conductor
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDriverRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: String,
    #[validate(length(min = 1, max = 20), custom = "validate_not_blank")]
    pub license_number: String,
    #[validate(length(min = 1, max = 15), regex(path = "PHONE_REGEX"))]
    pub phone: String,
}

// Request para actualizar nombre y teléfono (la licencia no cambia)
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDriverRequest {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub name: String,
    #[validate(length(min = 1, max = 15), regex(path = "PHONE_REGEX"))]
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverResponse {
    pub id: Uuid,
    pub name: String,
    pub license_number: String,
    pub phone: String,
    pub active: bool,
    /// Activo y sin viaje abierto
    pub available: bool,
}

impl DriverResponse {
    pub fn from_driver(driver: &Driver, has_active_trip: bool) -> Self {
        Self {
            id: driver.id(),
            name: driver.name().to_string(),
            license_number: driver.license_number().to_string(),
            phone: driver.phone().to_string(),
            active: driver.is_active(),
            available: driver.is_available(has_active_trip),
        }
    }
}
