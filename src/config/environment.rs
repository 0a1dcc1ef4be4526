//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Los valores numéricos inválidos son errores de arranque, nunca panics.

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};

/// Backend de persistencia
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow!(
                "STORAGE_BACKEND must be 'postgres' or 'memory', got '{}'",
                other
            )),
        }
    }
}

/// Parámetros de mantenimiento
#[derive(Debug, Clone)]
pub struct MaintenanceConfig {
    /// Días entre mantenimientos al registrar uno nuevo
    pub interval_days: i32,
    pub job_enabled: bool,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            interval_days: 90,
            job_enabled: true,
        }
    }
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub storage_backend: StorageBackend,
    pub cors_origins: Vec<String>,
    pub maintenance: MaintenanceConfig,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8080,
            storage_backend: StorageBackend::Postgres,
            cors_origins: Vec::new(),
            maintenance: MaintenanceConfig::default(),
        }
    }
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construir la configuración desde cualquier fuente clave/valor
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let interval_days: i32 = parse_or(&lookup, "MAINTENANCE_INTERVAL_DAYS", 90)?;
        if interval_days <= 0 {
            return Err(anyhow!("MAINTENANCE_INTERVAL_DAYS must be positive"));
        }

        Ok(Self {
            environment: lookup("ENVIRONMENT").unwrap_or(defaults.environment),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            storage_backend: parse_or(&lookup, "STORAGE_BACKEND", defaults.storage_backend)?,
            cors_origins: lookup("CORS_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            maintenance: MaintenanceConfig {
                interval_days,
                job_enabled: parse_or(&lookup, "MAINTENANCE_JOB_ENABLED", true)?,
            },
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Leer una variable opcional; si existe debe parsear
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{}", e))
            .with_context(|| format!("{} has an invalid value '{}'", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.storage_backend, StorageBackend::Postgres);
        assert_eq!(config.maintenance.interval_days, 90);
        assert!(config.maintenance.job_enabled);
        assert!(config.cors_origins.is_empty());
        assert!(config.is_development());
    }

    #[test]
    fn test_reads_overrides() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[
            ("PORT", "3000"),
            ("STORAGE_BACKEND", "memory"),
            ("CORS_ORIGINS", "http://a.test, http://b.test"),
            ("MAINTENANCE_INTERVAL_DAYS", "30"),
            ("MAINTENANCE_JOB_ENABLED", "false"),
        ]))
        .unwrap();

        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.cors_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.maintenance.interval_days, 30);
        assert!(!config.maintenance.job_enabled);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        assert!(EnvironmentConfig::from_lookup(lookup_from(&[("PORT", "abc")])).is_err());
        assert!(
            EnvironmentConfig::from_lookup(lookup_from(&[("STORAGE_BACKEND", "mongo")])).is_err()
        );
        assert!(EnvironmentConfig::from_lookup(lookup_from(&[(
            "MAINTENANCE_INTERVAL_DAYS",
            "0"
        )]))
        .is_err());
    }
}
