use anyhow::{anyhow, Result};
use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisResult};
use tracing::{debug, error, info, warn};

use super::CacheStore;

const KEY_PREFIX: &str = "fleet_manager";

/// Cliente Redis con connection pooling y operaciones async
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
}

impl RedisClient {
    /// Crear nuevo cliente Redis
    pub async fn new(redis_url: &str) -> Result<Self> {
        info!("🔗 Conectando a Redis: {}", redis_url);

        let client = redis::Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        // Test de conexión usando un comando simple
        let mut conn = manager.clone();
        let _: () = redis::cmd("PING").query_async(&mut conn).await?;

        info!("✅ Redis conectado exitosamente");

        Ok(Self { manager })
    }

    /// Generar clave de cache con prefijo
    fn make_key(key: &str) -> String {
        format!("{}:{}", KEY_PREFIX, key)
    }
}

#[async_trait]
impl CacheStore for RedisClient {
    async fn get_raw(&self, key: &str) -> Option<String> {
        let mut conn = self.manager.clone();

        match conn.get::<_, Option<String>>(Self::make_key(key)).await {
            Ok(Some(value)) => Some(value),
            Ok(None) => {
                debug!("❌ Cache MISS para clave: {}", key);
                None
            }
            Err(e) => {
                warn!("⚠️ Error leyendo cache para clave {}: {}", key, e);
                None
            }
        }
    }

    async fn set_raw(&self, key: &str, value: String, ttl_secs: u64) -> Result<()> {
        let mut conn = self.manager.clone();

        let result: RedisResult<()> = conn.set_ex(Self::make_key(key), value, ttl_secs).await;

        match result {
            Ok(()) => {
                debug!("💾 Cache SET para clave: {} (TTL: {}s)", key, ttl_secs);
                Ok(())
            }
            Err(e) => {
                error!("❌ Error guardando en cache para clave {}: {}", key, e);
                Err(anyhow!("Error de Redis: {}", e))
            }
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut conn = self.manager.clone();

        let count: i64 = conn
            .del(Self::make_key(key))
            .await
            .map_err(|e| anyhow!("Error de Redis: {}", e))?;
        debug!("🗑️ Cache DELETE para clave: {} (eliminados: {})", key, count);
        Ok(())
    }

    async fn remove_by_pattern(&self, pattern: &str) -> Result<()> {
        let mut conn = self.manager.clone();

        let keys: Vec<String> = redis::cmd("KEYS")
            .arg(Self::make_key(pattern))
            .query_async(&mut conn)
            .await
            .map_err(|e| anyhow!("Error de Redis: {}", e))?;
        if keys.is_empty() {
            return Ok(());
        }

        let count: i64 = conn
            .del(&keys)
            .await
            .map_err(|e| anyhow!("Error de Redis: {}", e))?;
        debug!("🗑️ Cache DELETE por patrón {} (eliminados: {})", pattern, count);
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        let mut conn = self.manager.clone();
        match redis::cmd("PING").query_async::<_, String>(&mut conn).await {
            Ok(response) => response == "PONG",
            Err(_) => false,
        }
    }

    fn name(&self) -> &'static str {
        "redis"
    }
}
