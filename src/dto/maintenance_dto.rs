use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::MaintenanceRecord;
use crate::utils::validation::validate_not_blank;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceRecordRequest {
    pub vehicle_id: Uuid,
    pub date: DateTime<Utc>,
    #[validate(length(min = 1, max = 500), custom = "validate_not_blank")]
    pub description: String,
    #[validate(custom = "validate_cost")]
    pub cost: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceRecordResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub date: DateTime<Utc>,
    pub description: String,
    pub cost: Decimal,
}

impl From<&MaintenanceRecord> for MaintenanceRecordResponse {
    fn from(record: &MaintenanceRecord) -> Self {
        Self {
            id: record.id(),
            vehicle_id: record.vehicle_id(),
            date: record.date(),
            description: record.description().to_string(),
            cost: record.cost(),
        }
    }
}

/// Query string de `/upcoming`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpcomingMaintenanceQuery {
    pub days_threshold: Option<i32>,
}

// NUMERIC(10,2): no negativo y como mucho 8 dígitos enteros
fn validate_cost(cost: &Decimal) -> Result<(), ValidationError> {
    if *cost < Decimal::ZERO {
        return Err(ValidationError::new("non_negative"));
    }
    if cost.trunc().abs() >= Decimal::new(100_000_000, 0) {
        return Err(ValidationError::new("range"));
    }
    Ok(())
}
