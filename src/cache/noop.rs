use anyhow::Result;
use async_trait::async_trait;

use super::CacheStore;

/// Cache vacío: toda lectura es un miss, toda escritura se descarta
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

#[async_trait]
impl CacheStore for NoopCache {
    async fn get_raw(&self, _key: &str) -> Option<String> {
        None
    }

    async fn set_raw(&self, _key: &str, _value: String, _ttl_secs: u64) -> Result<()> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }

    async fn remove_by_pattern(&self, _pattern: &str) -> Result<()> {
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "noop"
    }
}
