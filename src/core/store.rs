//! Key-value storage abstraction

use anyhow::Result;
use async_trait::async_trait;

/// A durable string key-value store.
///
/// Each `set` replaces the whole value under a key in one step; callers rely on
/// this to persist entire collections without partial writes.
#[async_trait]
pub trait Store: Send + Sync {
    /// Returns the value under `key`, or `None` if it was never written.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: String) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}
