use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{map_db_error, DriverRepository};
use crate::models::Driver;
use crate::utils::errors::{not_found_error, AppResult};

#[derive(Debug, sqlx::FromRow)]
struct DriverRow {
    id: Uuid,
    name: String,
    license_number: String,
    phone: String,
    active: bool,
}

impl From<DriverRow> for Driver {
    fn from(row: DriverRow) -> Self {
        Driver::restore(row.id, row.name, row.license_number, row.phone, row.active)
    }
}

pub struct PgDriverRepository {
    pool: PgPool,
}

impl PgDriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DriverRepository for PgDriverRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Driver>> {
        let row = sqlx::query_as::<_, DriverRow>(
            "SELECT id, name, license_number, phone, active FROM drivers WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("Error finding driver", e))?;

        Ok(row.map(Driver::from))
    }

    async fn find_all(&self) -> AppResult<Vec<Driver>> {
        let rows = sqlx::query_as::<_, DriverRow>(
            "SELECT id, name, license_number, phone, active FROM drivers ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Error listing drivers", e))?;

        Ok(rows.into_iter().map(Driver::from).collect())
    }

    async fn find_available(&self) -> AppResult<Vec<Driver>> {
        // Usa el índice parcial ix_trips_driver_active
        let rows = sqlx::query_as::<_, DriverRow>(
            r#"
            SELECT d.id, d.name, d.license_number, d.phone, d.active
            FROM drivers d
            WHERE d.active
              AND NOT EXISTS (
                  SELECT 1 FROM trips t WHERE t.driver_id = d.id AND t.end_date IS NULL
              )
            ORDER BY d.name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Error listing available drivers", e))?;

        Ok(rows.into_iter().map(Driver::from).collect())
    }

    async fn find_by_license_number(&self, license_number: &str) -> AppResult<Option<Driver>> {
        let row = sqlx::query_as::<_, DriverRow>(
            "SELECT id, name, license_number, phone, active FROM drivers WHERE license_number = $1",
        )
        .bind(license_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("Error finding driver by license number", e))?;

        Ok(row.map(Driver::from))
    }

    async fn add(&self, driver: &Driver) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO drivers (id, name, license_number, phone, active) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(driver.id())
        .bind(driver.name())
        .bind(driver.license_number())
        .bind(driver.phone())
        .bind(driver.is_active())
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Error creating driver", e))?;

        Ok(())
    }

    async fn update(&self, driver: &Driver) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE drivers SET name = $2, license_number = $3, phone = $4, active = $5 WHERE id = $1",
        )
        .bind(driver.id())
        .bind(driver.name())
        .bind(driver.license_number())
        .bind(driver.phone())
        .bind(driver.is_active())
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Error updating driver", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Driver", driver.id()));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM drivers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| map_db_error("Error deleting driver", e))?;

        Ok(result.rows_affected() > 0)
    }
}
