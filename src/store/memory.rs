use crate::core::store::Store;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// In-memory store implementation using HashMap and Mutex
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.inner.lock().await;
        let value = entries.get(key).cloned();
        debug!(key, hit = value.is_some(), "Store GET");
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.inner.lock().await;
        debug!(key, "Store SET");
        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.inner.lock().await;
        entries.remove(key);
        debug!(key, "Store REMOVE");
        Ok(())
    }
}
