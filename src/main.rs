use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use fleet_manager::cache::{Cache, CacheConfig, RedisClient};
use fleet_manager::config::{DatabaseConfig, EnvironmentConfig, StorageBackend};
use fleet_manager::database;
use fleet_manager::jobs::maintenance_check_job::ALERT_THRESHOLD_DAYS;
use fleet_manager::repositories::MemoryStore;
use fleet_manager::{create_router, AppState, Repositories};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging (RUST_LOG tiene prioridad)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,fleet_manager=debug")),
        )
        .init();

    info!("🚚 Fleet Manager API");
    info!("====================");

    let config = EnvironmentConfig::from_env().context("Configuración inválida")?;
    let cache_config = CacheConfig::from_env().context("Configuración de cache inválida")?;

    let repositories = match config.storage_backend {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = match database::create_pool(&db_config).await {
                Ok(pool) => pool,
                Err(e) => {
                    error!("❌ Error conectando a la base de datos: {}", e);
                    return Err(e.context("Error de base de datos"));
                }
            };
            database::run_migrations(&pool).await?;
            Repositories::postgres(pool)
        }
        StorageBackend::Memory => {
            warn!("⚠️ Usando almacenamiento en memoria: los datos no sobreviven al reinicio");
            Repositories::in_memory(MemoryStore::new())
        }
    };

    let cache = match &cache_config.redis_url {
        Some(url) => match RedisClient::new(url).await {
            Ok(client) => Cache::new(Arc::new(client), cache_config.default_ttl),
            Err(e) => {
                error!("❌ Error conectando a Redis: {}", e);
                return Err(e.context("Error de Redis"));
            }
        },
        None => {
            info!("ℹ️ REDIS_URL no configurada, cache deshabilitado");
            Cache::disabled()
        }
    };
    // Los listados cacheados por un proceso anterior pueden estar obsoletos
    cache.invalidate_pattern("*:available").await;

    let app_state = AppState::new(config.clone(), &repositories, cache);

    if config.maintenance.job_enabled {
        app_state.maintenance_check_job(&repositories).spawn_daily();
        info!(
            "⏰ Job de mantenimiento programado (00:00 UTC, umbral {} días)",
            ALERT_THRESHOLD_DAYS
        );
    }

    let app = create_router(app_state);

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("Dirección inválida: {}", config.server_url()))?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health");
    info!("   /api/vehicles     GET POST | /available | /:id GET PUT DELETE");
    info!("   /api/drivers      GET POST | /available | /:id GET PUT DELETE | /:id/activate | /:id/deactivate");
    info!("   /api/trips        GET | /active | /start | /end/:id | /:id");
    info!("   /api/maintenance  POST | /vehicle/:id | /upcoming?daysThreshold=N");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
