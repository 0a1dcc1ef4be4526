//! Modelo de MaintenanceRecord (sólo se agregan registros, nunca se modifican)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::errors::{invalid_argument, require_not_blank, DomainResult};

pub const DESCRIPTION_MAX_LEN: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceRecord {
    id: Uuid,
    vehicle_id: Uuid,
    date: DateTime<Utc>,
    description: String,
    cost: Decimal,
}

impl MaintenanceRecord {
    pub fn new(
        vehicle_id: Uuid,
        date: DateTime<Utc>,
        description: &str,
        cost: Decimal,
    ) -> DomainResult<Self> {
        if vehicle_id.is_nil() {
            return Err(invalid_argument("Vehicle ID cannot be empty"));
        }
        require_not_blank(description, "Description")?;
        if cost < Decimal::ZERO {
            return Err(invalid_argument("Cost cannot be negative"));
        }

        Ok(Self {
            id: Uuid::new_v4(),
            vehicle_id,
            date,
            description: description.trim().to_string(),
            cost,
        })
    }

    pub fn restore(
        id: Uuid,
        vehicle_id: Uuid,
        date: DateTime<Utc>,
        description: String,
        cost: Decimal,
    ) -> Self {
        Self {
            id,
            vehicle_id,
            date,
            description,
            cost,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn vehicle_id(&self) -> Uuid {
        self.vehicle_id
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn cost(&self) -> Decimal {
        self.cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record() {
        let vehicle_id = Uuid::new_v4();
        let record =
            MaintenanceRecord::new(vehicle_id, Utc::now(), "Oil change", Decimal::new(15050, 2))
                .unwrap();
        assert_eq!(record.vehicle_id(), vehicle_id);
        assert_eq!(record.cost().to_string(), "150.50");
    }

    #[test]
    fn test_record_validation() {
        let vehicle_id = Uuid::new_v4();
        assert!(MaintenanceRecord::new(Uuid::nil(), Utc::now(), "Oil", Decimal::ONE).is_err());
        assert!(MaintenanceRecord::new(vehicle_id, Utc::now(), "  ", Decimal::ONE).is_err());
        assert!(
            MaintenanceRecord::new(vehicle_id, Utc::now(), "Oil", Decimal::new(-1, 0)).is_err()
        );
        assert!(MaintenanceRecord::new(vehicle_id, Utc::now(), "Free check", Decimal::ZERO).is_ok());
    }
}
