//! Cache
//!
//! Capacidad de cache para listados de lectura frecuente. `RedisClient` la implementa
//! sobre Redis; `NoopCache` cuando no hay Redis configurado. Los servicios sólo ven
//! `Cache`, que serializa a JSON y nunca hace fallar una petición por un error de cache.

pub mod cache_config;
pub mod noop;
pub mod redis_client;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

pub use cache_config::CacheConfig;
pub use noop::NoopCache;
pub use redis_client::RedisClient;

pub const VEHICLES_AVAILABLE_KEY: &str = "vehicles:available";
pub const DRIVERS_AVAILABLE_KEY: &str = "drivers:available";

/// Operaciones de cache sobre valores ya serializados
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Los errores de lectura se degradan a `None`
    async fn get_raw(&self, key: &str) -> Option<String>;
    async fn set_raw(&self, key: &str, value: String, ttl_secs: u64) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
    /// Patrón estilo glob de Redis (`vehicles:*`)
    async fn remove_by_pattern(&self, pattern: &str) -> Result<()>;
    async fn is_connected(&self) -> bool;
    fn name(&self) -> &'static str;
}

/// Cache tipado compartido por los servicios
#[derive(Clone)]
pub struct Cache {
    store: Arc<dyn CacheStore>,
    default_ttl: u64,
}

impl Cache {
    pub fn new(store: Arc<dyn CacheStore>, default_ttl: u64) -> Self {
        Self { store, default_ttl }
    }

    pub fn disabled() -> Self {
        Self::new(Arc::new(NoopCache), CacheConfig::default().default_ttl)
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.name()
    }

    pub async fn is_connected(&self) -> bool {
        self.store.is_connected().await
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get_raw(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!("📥 Cache HIT para clave: {}", key);
                Some(value)
            }
            Err(e) => {
                warn!("⚠️ Valor corrupto en cache para clave {}: {}", key, e);
                None
            }
        }
    }

    pub async fn set<T: Serialize + Sync>(&self, key: &str, value: &T) {
        let serialized = match serde_json::to_string(value) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!("⚠️ No se pudo serializar valor para clave {}: {}", key, e);
                return;
            }
        };
        if let Err(e) = self.store.set_raw(key, serialized, self.default_ttl).await {
            warn!("⚠️ Error guardando en cache para clave {}: {}", key, e);
        }
    }

    pub async fn invalidate(&self, key: &str) {
        match self.store.remove(key).await {
            Ok(()) => debug!("🗑️ Cache invalidado: {}", key),
            Err(e) => warn!("⚠️ Error invalidando cache para clave {}: {}", key, e),
        }
    }

    pub async fn invalidate_pattern(&self, pattern: &str) {
        if let Err(e) = self.store.remove_by_pattern(pattern).await {
            warn!("⚠️ Error invalidando cache por patrón {}: {}", pattern, e);
        }
    }
}
