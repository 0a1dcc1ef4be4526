use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{map_db_error, VehicleRepository};
use crate::models::{Vehicle, VehicleStatus};
use crate::utils::errors::{not_found_error, AppResult};

const SELECT_VEHICLES: &str = r#"
    SELECT id, plate, model, year, mileage, last_maintenance_date, next_maintenance_date, status
    FROM vehicles
"#;

// Fila tal cual sale de la tabla vehicles
#[derive(Debug, sqlx::FromRow)]
struct VehicleRow {
    id: Uuid,
    plate: String,
    model: String,
    year: i32,
    mileage: i32,
    last_maintenance_date: DateTime<Utc>,
    next_maintenance_date: DateTime<Utc>,
    status: VehicleStatus,
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Vehicle::restore(
            row.id,
            row.plate,
            row.model,
            row.year,
            row.mileage,
            row.last_maintenance_date,
            row.next_maintenance_date,
            row.status,
        )
    }
}

pub struct PgVehicleRepository {
    pool: PgPool,
}

impl PgVehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_many(&self, sql: String, context: &str) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_db_error(context, e))?;

        Ok(rows.into_iter().map(Vehicle::from).collect())
    }
}

#[async_trait]
impl VehicleRepository for PgVehicleRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Vehicle>> {
        let row = sqlx::query_as::<_, VehicleRow>(&format!("{} WHERE id = $1", SELECT_VEHICLES))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Error finding vehicle", e))?;

        Ok(row.map(Vehicle::from))
    }

    async fn find_all(&self) -> AppResult<Vec<Vehicle>> {
        self.fetch_many(
            format!("{} ORDER BY plate", SELECT_VEHICLES),
            "Error listing vehicles",
        )
        .await
    }

    async fn find_available(&self) -> AppResult<Vec<Vehicle>> {
        self.fetch_many(
            format!(
                "{} WHERE status = 'available'::vehicle_status ORDER BY plate",
                SELECT_VEHICLES
            ),
            "Error listing available vehicles",
        )
        .await
    }

    async fn find_by_plate(&self, plate: &str) -> AppResult<Option<Vehicle>> {
        let row =
            sqlx::query_as::<_, VehicleRow>(&format!("{} WHERE plate = $1", SELECT_VEHICLES))
                .bind(plate)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_db_error("Error finding vehicle by plate", e))?;

        Ok(row.map(Vehicle::from))
    }

    async fn find_with_upcoming_maintenance(
        &self,
        threshold_date: DateTime<Utc>,
    ) -> AppResult<Vec<Vehicle>> {
        let rows = sqlx::query_as::<_, VehicleRow>(&format!(
            "{} WHERE next_maintenance_date <= $1 ORDER BY next_maintenance_date",
            SELECT_VEHICLES
        ))
        .bind(threshold_date)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Error listing vehicles with upcoming maintenance", e))?;

        Ok(rows.into_iter().map(Vehicle::from).collect())
    }

    async fn add(&self, vehicle: &Vehicle) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO vehicles (id, plate, model, year, mileage, last_maintenance_date, next_maintenance_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(vehicle.id())
        .bind(vehicle.plate())
        .bind(vehicle.model())
        .bind(vehicle.year())
        .bind(vehicle.mileage())
        .bind(vehicle.last_maintenance_date())
        .bind(vehicle.next_maintenance_date())
        .bind(vehicle.status())
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Error creating vehicle", e))?;

        Ok(())
    }

    async fn update(&self, vehicle: &Vehicle) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE vehicles
            SET plate = $2, model = $3, year = $4, mileage = $5,
                last_maintenance_date = $6, next_maintenance_date = $7, status = $8
            WHERE id = $1
            "#,
        )
        .bind(vehicle.id())
        .bind(vehicle.plate())
        .bind(vehicle.model())
        .bind(vehicle.year())
        .bind(vehicle.mileage())
        .bind(vehicle.last_maintenance_date())
        .bind(vehicle.next_maintenance_date())
        .bind(vehicle.status())
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Error updating vehicle", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Vehicle", vehicle.id()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        // maintenance_records cae por ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Error deleting vehicle", e))?;

        Ok(result.rows_affected() > 0)
    }
}
