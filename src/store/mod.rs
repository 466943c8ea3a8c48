pub mod disk;
pub mod memory;

use crate::core::config::AppConfig;
use crate::core::store::Store;
use anyhow::Result;
use disk::DiskStore;
use std::sync::Arc;

pub use memory::MemoryStore;

/// Opens the durable store under the configured data directory.
pub fn open_default(config: &AppConfig) -> Result<Arc<dyn Store>> {
    let path = config.default_data_path()?.join("store");
    Ok(Arc::new(DiskStore::open(&path)?))
}
