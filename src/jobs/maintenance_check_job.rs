//! Job diario de mantenimiento
//!
//! Cada día a las 00:00 UTC busca vehículos cuyo próximo mantenimiento cae dentro del
//! umbral de alerta y emite una alerta por vehículo. Las ejecuciones son secuenciales
//! dentro de una única tarea, así que nunca se solapan.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::task::JoinHandle;

use crate::models::vehicle::maintenance_threshold_date;
use crate::models::Vehicle;
use crate::repositories::VehicleRepository;
use crate::utils::errors::AppResult;

/// Días hacia adelante que cubre cada verificación
pub const ALERT_THRESHOLD_DAYS: i32 = 3;

#[derive(Clone)]
pub struct MaintenanceCheckJob {
    vehicles: Arc<dyn VehicleRepository>,
}

impl MaintenanceCheckJob {
    pub fn new(vehicles: Arc<dyn VehicleRepository>) -> Self {
        Self { vehicles }
    }

    /// Ejecutar una verificación y devolver los vehículos alertados
    pub async fn execute(&self) -> AppResult<Vec<Vehicle>> {
        self.execute_at(Utc::now()).await
    }

    pub async fn execute_at(&self, now: DateTime<Utc>) -> AppResult<Vec<Vehicle>> {
        let threshold_date = maintenance_threshold_date(ALERT_THRESHOLD_DAYS, now)?;
        let vehicles = self
            .vehicles
            .find_with_upcoming_maintenance(threshold_date)
            .await?;

        for vehicle in &vehicles {
            log::warn!(
                "[ALERTA] Vehículo {} con mantenimiento próximo ({})",
                vehicle.plate(),
                vehicle.next_maintenance_date().format("%d/%m/%Y")
            );
        }
        log::info!(
            "🔧 Verificación de mantenimiento completada: {} vehículo(s) con mantenimiento en los próximos {} días",
            vehicles.len(),
            ALERT_THRESHOLD_DAYS
        );

        Ok(vehicles)
    }

    /// Lanzar el job en segundo plano, una vez al día a medianoche UTC
    pub fn spawn_daily(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let wait = duration_until_next_midnight(Utc::now());
                log::debug!(
                    "⏰ Próxima verificación de mantenimiento en {} s",
                    wait.as_secs()
                );
                tokio::time::sleep(wait).await;

                if let Err(e) = self.execute().await {
                    log::error!("❌ Error en verificación de mantenimiento: {}", e);
                }
            }
        })
    }
}

/// Tiempo hasta la próxima medianoche UTC (estrictamente en el futuro)
pub fn duration_until_next_midnight(now: DateTime<Utc>) -> std::time::Duration {
    let next_midnight = (now.date_naive() + Duration::days(1))
        .and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or(now + Duration::days(1));

    (next_midnight - now)
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(24 * 60 * 60))
}
