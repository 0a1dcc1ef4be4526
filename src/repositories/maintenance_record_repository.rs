use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use super::{map_db_error, MaintenanceRecordRepository};
use crate::models::MaintenanceRecord;
use crate::utils::errors::AppResult;

#[derive(Debug, sqlx::FromRow)]
struct MaintenanceRecordRow {
    id: Uuid,
    vehicle_id: Uuid,
    date: DateTime<Utc>,
    description: String,
    cost: Decimal,
}

impl From<MaintenanceRecordRow> for MaintenanceRecord {
    fn from(row: MaintenanceRecordRow) -> Self {
        MaintenanceRecord::restore(row.id, row.vehicle_id, row.date, row.description, row.cost)
    }
}

pub struct PgMaintenanceRecordRepository {
    pool: PgPool,
}

impl PgMaintenanceRecordRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MaintenanceRecordRepository for PgMaintenanceRecordRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<MaintenanceRecord>> {
        let row = sqlx::query_as::<_, MaintenanceRecordRow>(
            "SELECT id, vehicle_id, date, description, cost FROM maintenance_records WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_db_error("Error finding maintenance record", e))?;

        Ok(row.map(MaintenanceRecord::from))
    }

    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceRecord>> {
        let rows = sqlx::query_as::<_, MaintenanceRecordRow>(
            r#"
            SELECT id, vehicle_id, date, description, cost
            FROM maintenance_records
            WHERE vehicle_id = $1
            ORDER BY date DESC
            "#,
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Error listing maintenance records", e))?;

        Ok(rows.into_iter().map(MaintenanceRecord::from).collect())
    }

    async fn add(&self, record: &MaintenanceRecord) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO maintenance_records (id, vehicle_id, date, description, cost)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.id())
        .bind(record.vehicle_id())
        .bind(record.date())
        .bind(record.description())
        .bind(record.cost())
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Error creating maintenance record", e))?;

        Ok(())
    }
}
