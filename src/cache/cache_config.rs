//! Configuración de cache
//!
//! Este módulo contiene la configuración para el sistema de cache.

use std::env;

use anyhow::Result;

use crate::config::environment::parse_or;

/// Configuración del cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Sin URL se usa `NoopCache`
    pub redis_url: Option<String>,
    pub default_ttl: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            default_ttl: 300, // 5 minutos
        }
    }
}

impl CacheConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            redis_url: lookup("REDIS_URL").filter(|url| !url.trim().is_empty()),
            default_ttl: parse_or(&lookup, "CACHE_DEFAULT_TTL_SECONDS", 300)?,
        })
    }
}
