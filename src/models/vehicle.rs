//! Modelo de Vehicle
//!
//! Máquina de estados del vehículo:
//! `Available -> InUse -> Available` (viajes) y
//! `Available -> InMaintenance -> Available` (mantenimiento).
//! Los campos son privados; sólo cambian a través de las operaciones con nombre.

use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Type;
use uuid::Uuid;

use super::errors::{invalid_argument, invalid_operation, require_not_blank, DomainResult};

pub const MIN_YEAR: i32 = 1900;
pub const PLATE_MAX_LEN: usize = 10;
pub const MODEL_MAX_LEN: usize = 100;

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "vehicle_status", rename_all = "snake_case")]
pub enum VehicleStatus {
    Available,
    InUse,
    InMaintenance,
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            VehicleStatus::Available => "Available",
            VehicleStatus::InUse => "InUse",
            VehicleStatus::InMaintenance => "InMaintenance",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    id: Uuid,
    plate: String,
    model: String,
    year: i32,
    mileage: i32,
    last_maintenance_date: DateTime<Utc>,
    next_maintenance_date: DateTime<Utc>,
    status: VehicleStatus,
}

impl Vehicle {
    /// Crear un vehículo nuevo. Sin fecha de último mantenimiento se usa la fecha actual,
    /// y el próximo mantenimiento arranca igual al último (el vehículo nace "vencido").
    pub fn new(
        plate: &str,
        model: &str,
        year: i32,
        mileage: i32,
        last_maintenance_date: Option<DateTime<Utc>>,
    ) -> DomainResult<Self> {
        require_not_blank(plate, "Plate")?;
        require_not_blank(model, "Model")?;
        validate_year(year)?;
        if mileage < 0 {
            return Err(invalid_argument("Mileage cannot be negative"));
        }

        let last = last_maintenance_date.unwrap_or_else(Utc::now);
        Ok(Self {
            id: Uuid::new_v4(),
            plate: plate.trim().to_string(),
            model: model.trim().to_string(),
            year,
            mileage,
            last_maintenance_date: last,
            next_maintenance_date: last,
            status: VehicleStatus::Available,
        })
    }

    /// Reconstruir desde una fila persistida, sin aplicar los valores por defecto de creación.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        plate: String,
        model: String,
        year: i32,
        mileage: i32,
        last_maintenance_date: DateTime<Utc>,
        next_maintenance_date: DateTime<Utc>,
        status: VehicleStatus,
    ) -> Self {
        Self {
            id,
            plate,
            model,
            year,
            mileage,
            last_maintenance_date,
            next_maintenance_date,
            status,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn plate(&self) -> &str {
        &self.plate
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn mileage(&self) -> i32 {
        self.mileage
    }

    pub fn last_maintenance_date(&self) -> DateTime<Utc> {
        self.last_maintenance_date
    }

    pub fn next_maintenance_date(&self) -> DateTime<Utc> {
        self.next_maintenance_date
    }

    pub fn status(&self) -> VehicleStatus {
        self.status
    }

    /// Actualizar modelo y año (reemplaza el camino de actualización por reflexión)
    pub fn update_details(&mut self, model: &str, year: i32) -> DomainResult<()> {
        require_not_blank(model, "Model")?;
        validate_year(year)?;
        self.model = model.trim().to_string();
        self.year = year;
        Ok(())
    }

    /// El kilometraje nunca disminuye
    pub fn update_mileage(&mut self, new_mileage: i32) -> DomainResult<()> {
        if new_mileage < self.mileage {
            return Err(invalid_argument(
                "New mileage cannot be less than current mileage",
            ));
        }
        self.mileage = new_mileage;
        Ok(())
    }

    pub fn start_trip(&mut self) -> DomainResult<()> {
        if self.status != VehicleStatus::Available {
            return Err(invalid_operation(format!(
                "Vehicle cannot start trip. Current status: {}",
                self.status
            )));
        }
        self.status = VehicleStatus::InUse;
        Ok(())
    }

    pub fn end_trip(&mut self, distance_traveled: i32) -> DomainResult<()> {
        if self.status != VehicleStatus::InUse {
            return Err(invalid_operation(format!(
                "Vehicle is not currently in use. Current status: {}",
                self.status
            )));
        }
        if distance_traveled < 0 {
            return Err(invalid_argument("Distance traveled cannot be negative"));
        }
        let mileage = self
            .mileage
            .checked_add(distance_traveled)
            .ok_or_else(|| invalid_argument("Distance traveled overflows mileage"))?;

        self.mileage = mileage;
        self.status = VehicleStatus::Available;
        Ok(())
    }

    /// Idempotente desde `Available` o `InMaintenance`
    pub fn start_maintenance(&mut self) -> DomainResult<()> {
        if self.status == VehicleStatus::InUse {
            return Err(invalid_operation(
                "Cannot start maintenance while vehicle is in use",
            ));
        }
        self.status = VehicleStatus::InMaintenance;
        Ok(())
    }

    pub fn complete_maintenance(
        &mut self,
        maintenance_date: DateTime<Utc>,
        interval_days: i32,
    ) -> DomainResult<()> {
        if self.status != VehicleStatus::InMaintenance {
            return Err(invalid_operation(format!(
                "Vehicle is not in maintenance. Current status: {}",
                self.status
            )));
        }
        if interval_days <= 0 {
            return Err(invalid_argument("Interval days must be positive"));
        }

        let next = add_days(maintenance_date, interval_days)?;
        self.last_maintenance_date = maintenance_date;
        self.next_maintenance_date = next;
        self.status = VehicleStatus::Available;
        Ok(())
    }

    /// Próximo mantenimiento = último mantenimiento + `interval_days` días de calendario
    pub fn schedule_next_maintenance(&mut self, interval_days: i32) -> DomainResult<()> {
        if interval_days <= 0 {
            return Err(invalid_argument("Days interval must be positive"));
        }
        self.next_maintenance_date = add_days(self.last_maintenance_date, interval_days)?;
        Ok(())
    }

    pub fn is_maintenance_due(&self, days_threshold: i32) -> DomainResult<bool> {
        self.is_maintenance_due_at(days_threshold, Utc::now())
    }

    /// `next_maintenance_date <= now + days_threshold` (el límite cuenta como vencido)
    pub fn is_maintenance_due_at(
        &self,
        days_threshold: i32,
        now: DateTime<Utc>,
    ) -> DomainResult<bool> {
        Ok(self.next_maintenance_date <= maintenance_threshold_date(days_threshold, now)?)
    }
}

/// Fecha límite compartida por el predicado de la entidad y las consultas de repositorio
pub fn maintenance_threshold_date(
    days_threshold: i32,
    now: DateTime<Utc>,
) -> DomainResult<DateTime<Utc>> {
    if days_threshold < 0 {
        return Err(invalid_argument("Days threshold cannot be negative"));
    }
    now.checked_add_signed(Duration::days(i64::from(days_threshold)))
        .ok_or_else(|| invalid_argument("Days threshold out of range"))
}

fn add_days(date: DateTime<Utc>, days: i32) -> DomainResult<DateTime<Utc>> {
    date.checked_add_signed(Duration::days(i64::from(days)))
        .ok_or_else(|| invalid_argument("Days interval out of range"))
}

fn validate_year(year: i32) -> DomainResult<()> {
    let max_year = Utc::now().year() + 1;
    if year < MIN_YEAR || year > max_year {
        return Err(invalid_argument("Invalid year"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::DomainError;
    use chrono::TimeZone;

    fn vehicle_with_mileage(mileage: i32) -> Vehicle {
        Vehicle::new("ABC1234", "Sprinter", 2022, mileage, None).unwrap()
    }

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_new_vehicle_defaults() {
        let last = utc(2024, 1, 1);
        let vehicle = Vehicle::new("ABC1234", "Sprinter", 2022, 1000, Some(last)).unwrap();

        assert_eq!(vehicle.status(), VehicleStatus::Available);
        assert_eq!(vehicle.last_maintenance_date(), last);
        assert_eq!(vehicle.next_maintenance_date(), last);
    }

    #[test]
    fn test_new_vehicle_rejects_invalid_input() {
        assert!(matches!(
            Vehicle::new(" ", "Sprinter", 2022, 0, None),
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(Vehicle::new("ABC1234", "", 2022, 0, None).is_err());
        assert!(Vehicle::new("ABC1234", "Sprinter", 1899, 0, None).is_err());
        assert!(Vehicle::new("ABC1234", "Sprinter", Utc::now().year() + 2, 0, None).is_err());
        assert!(Vehicle::new("ABC1234", "Sprinter", Utc::now().year() + 1, 0, None).is_ok());
        assert!(Vehicle::new("ABC1234", "Sprinter", 2022, -1, None).is_err());
    }

    #[test]
    fn test_start_and_end_trip_updates_mileage() {
        let mut vehicle = vehicle_with_mileage(1000);

        vehicle.start_trip().unwrap();
        assert_eq!(vehicle.status(), VehicleStatus::InUse);

        vehicle.end_trip(150).unwrap();
        assert_eq!(vehicle.status(), VehicleStatus::Available);
        assert_eq!(vehicle.mileage(), 1150);
    }

    #[test]
    fn test_start_trip_requires_available() {
        let mut vehicle = vehicle_with_mileage(0);
        vehicle.start_trip().unwrap();
        assert!(matches!(
            vehicle.start_trip(),
            Err(DomainError::InvalidOperation(_))
        ));

        let mut in_maintenance = vehicle_with_mileage(0);
        in_maintenance.start_maintenance().unwrap();
        assert!(matches!(
            in_maintenance.start_trip(),
            Err(DomainError::InvalidOperation(_))
        ));
        assert_eq!(in_maintenance.status(), VehicleStatus::InMaintenance);
    }

    #[test]
    fn test_end_trip_guards() {
        let mut vehicle = vehicle_with_mileage(500);
        assert!(matches!(
            vehicle.end_trip(10),
            Err(DomainError::InvalidOperation(_))
        ));

        vehicle.start_trip().unwrap();
        assert!(matches!(
            vehicle.end_trip(-1),
            Err(DomainError::InvalidArgument(_))
        ));
        assert_eq!(vehicle.mileage(), 500);
        assert_eq!(vehicle.status(), VehicleStatus::InUse);
    }

    #[test]
    fn test_start_maintenance_is_idempotent_but_not_while_in_use() {
        let mut vehicle = vehicle_with_mileage(0);
        vehicle.start_maintenance().unwrap();
        vehicle.start_maintenance().unwrap();
        assert_eq!(vehicle.status(), VehicleStatus::InMaintenance);

        let mut busy = vehicle_with_mileage(0);
        busy.start_trip().unwrap();
        assert!(matches!(
            busy.start_maintenance(),
            Err(DomainError::InvalidOperation(_))
        ));
        assert_eq!(busy.status(), VehicleStatus::InUse);
    }

    #[test]
    fn test_complete_maintenance_schedules_next_date() {
        let mut vehicle =
            Vehicle::new("ABC1234", "Sprinter", 2022, 0, Some(utc(2024, 1, 1))).unwrap();

        vehicle.start_maintenance().unwrap();
        vehicle.complete_maintenance(utc(2024, 6, 1), 90).unwrap();

        assert_eq!(vehicle.last_maintenance_date(), utc(2024, 6, 1));
        assert_eq!(vehicle.next_maintenance_date(), utc(2024, 8, 30));
        assert_eq!(vehicle.status(), VehicleStatus::Available);
    }

    #[test]
    fn test_complete_maintenance_guards() {
        let mut vehicle = vehicle_with_mileage(0);
        assert!(matches!(
            vehicle.complete_maintenance(utc(2024, 6, 1), 90),
            Err(DomainError::InvalidOperation(_))
        ));

        vehicle.start_maintenance().unwrap();
        assert!(matches!(
            vehicle.complete_maintenance(utc(2024, 6, 1), 0),
            Err(DomainError::InvalidArgument(_))
        ));
        assert_eq!(vehicle.status(), VehicleStatus::InMaintenance);
    }

    #[test]
    fn test_update_mileage_is_monotonic() {
        let mut vehicle = vehicle_with_mileage(1000);

        assert!(matches!(
            vehicle.update_mileage(500),
            Err(DomainError::InvalidArgument(_))
        ));
        assert_eq!(vehicle.mileage(), 1000);

        vehicle.update_mileage(1500).unwrap();
        assert_eq!(vehicle.mileage(), 1500);
        vehicle.update_mileage(1500).unwrap();
    }

    #[test]
    fn test_is_maintenance_due_boundary() {
        let now = utc(2024, 3, 10);
        let mut vehicle =
            Vehicle::new("ABC1234", "Sprinter", 2022, 0, Some(utc(2024, 3, 3))).unwrap();
        vehicle.schedule_next_maintenance(10).unwrap(); // 2024-03-13

        assert!(vehicle.is_maintenance_due_at(3, now).unwrap());
        assert!(!vehicle.is_maintenance_due_at(2, now).unwrap());
        assert!(vehicle.is_maintenance_due_at(30, now).unwrap());
        assert!(matches!(
            vehicle.is_maintenance_due_at(-1, now),
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_schedule_next_maintenance_rejects_non_positive_interval() {
        let mut vehicle = vehicle_with_mileage(0);
        let before = vehicle.next_maintenance_date();
        assert!(vehicle.schedule_next_maintenance(0).is_err());
        assert!(vehicle.schedule_next_maintenance(-5).is_err());
        assert_eq!(vehicle.next_maintenance_date(), before);
    }

    #[test]
    fn test_out_of_range_days_are_rejected() {
        let now = utc(2024, 3, 10);
        assert!(matches!(
            maintenance_threshold_date(i32::MAX, now),
            Err(DomainError::InvalidArgument(_))
        ));

        let mut vehicle =
            Vehicle::new("ABC1234", "Sprinter", 2022, 0, Some(utc(2024, 1, 1))).unwrap();
        let before = vehicle.next_maintenance_date();
        assert!(vehicle.schedule_next_maintenance(i32::MAX).is_err());
        assert_eq!(vehicle.next_maintenance_date(), before);

        vehicle.start_maintenance().unwrap();
        assert!(matches!(
            vehicle.complete_maintenance(utc(2024, 6, 1), i32::MAX),
            Err(DomainError::InvalidArgument(_))
        ));
        assert_eq!(vehicle.last_maintenance_date(), utc(2024, 1, 1));
        assert_eq!(vehicle.status(), VehicleStatus::InMaintenance);
    }

    #[test]
    fn test_update_details() {
        let mut vehicle = vehicle_with_mileage(0);
        vehicle.update_details("Transit", 2020).unwrap();
        assert_eq!(vehicle.model(), "Transit");
        assert_eq!(vehicle.year(), 2020);

        assert!(vehicle.update_details("", 2020).is_err());
        assert!(vehicle.update_details("Transit", 1800).is_err());
        assert_eq!(vehicle.model(), "Transit");
    }
}
