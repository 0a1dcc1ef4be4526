use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{map_db_error, TripRepository};
use crate::models::Trip;
use crate::utils::errors::{not_found_error, AppResult};

const SELECT_TRIPS: &str =
    "SELECT id, vehicle_id, driver_id, route, start_date, end_date, distance FROM trips";

#[derive(Debug, sqlx::FromRow)]
struct TripRow {
    id: Uuid,
    vehicle_id: Uuid,
    driver_id: Uuid,
    route: String,
    start_date: DateTime<Utc>,
    end_date: Option<DateTime<Utc>>,
    distance: i32,
}

impl From<TripRow> for Trip {
    fn from(row: TripRow) -> Self {
        Trip::restore(
            row.id,
            row.vehicle_id,
            row.driver_id,
            row.route,
            row.start_date,
            row.end_date,
            row.distance,
        )
    }
}

pub struct PgTripRepository {
    pool: PgPool,
}

impl PgTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_owner(&self, column: &str, owner_id: Uuid) -> AppResult<Vec<Trip>> {
        let rows = sqlx::query_as::<_, TripRow>(&format!(
            "{} WHERE {} = $1 ORDER BY start_date DESC",
            SELECT_TRIPS, column
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Error listing trips", e))?;

        Ok(rows.into_iter().map(Trip::from).collect())
    }
}

#[async_trait]
impl TripRepository for PgTripRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Trip>> {
        let row = sqlx::query_as::<_, TripRow>(&format!("{} WHERE id = $1", SELECT_TRIPS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_db_error("Error finding trip", e))?;

        Ok(row.map(Trip::from))
    }

    async fn find_all(&self) -> AppResult<Vec<Trip>> {
        let rows =
            sqlx::query_as::<_, TripRow>(&format!("{} ORDER BY start_date DESC", SELECT_TRIPS))
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_db_error("Error listing trips", e))?;

        Ok(rows.into_iter().map(Trip::from).collect())
    }

    async fn find_active(&self) -> AppResult<Vec<Trip>> {
        let rows = sqlx::query_as::<_, TripRow>(&format!(
            "{} WHERE end_date IS NULL ORDER BY start_date DESC",
            SELECT_TRIPS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_db_error("Error listing active trips", e))?;

        Ok(rows.into_iter().map(Trip::from).collect())
    }

    async fn find_by_vehicle(&self, vehicle_id: Uuid) -> AppResult<Vec<Trip>> {
        self.fetch_by_owner("vehicle_id", vehicle_id).await
    }

    async fn find_by_driver(&self, driver_id: Uuid) -> AppResult<Vec<Trip>> {
        self.fetch_by_owner("driver_id", driver_id).await
    }

    async fn has_active_trip_for_driver(&self, driver_id: Uuid) -> AppResult<bool> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM trips WHERE driver_id = $1 AND end_date IS NULL)",
        )
        .bind(driver_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_db_error("Error checking active trips", e))?;

        Ok(result.0)
    }

    async fn add(&self, trip: &Trip) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO trips (id, vehicle_id, driver_id, route, start_date, end_date, distance)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(trip.id())
        .bind(trip.vehicle_id())
        .bind(trip.driver_id())
        .bind(trip.route())
        .bind(trip.start_date())
        .bind(trip.end_date())
        .bind(trip.distance())
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Error creating trip", e))?;

        Ok(())
    }

    async fn update(&self, trip: &Trip) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE trips SET route = $2, end_date = $3, distance = $4 WHERE id = $1",
        )
        .bind(trip.id())
        .bind(trip.route())
        .bind(trip.end_date())
        .bind(trip.distance())
        .execute(&self.pool)
        .await
        .map_err(|e| map_db_error("Error updating trip", e))?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("Trip", trip.id()));
        }
        Ok(())
    }
}
