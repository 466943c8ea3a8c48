//! Collection repositories over a [`Store`](crate::core::Store).
//!
//! Each repository keeps its whole collection as one JSON array under a single
//! key and rewrites it on every change. Listing never fails: unreadable or
//! corrupt data is logged and treated as an empty collection. Writes propagate
//! errors to the caller, including a failure to read the current collection, in
//! which case nothing is written.

pub mod categories;
pub mod transactions;

pub use categories::CategoryRepository;
pub use transactions::TransactionRepository;

use crate::core::store::Store;
use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};
use tracing::error;

/// Loads the JSON array stored under `key` for a read-modify-write.
/// `None` means the key was never written. Read and parse errors are returned
/// so the caller does not overwrite data it could not read.
async fn load_collection<T: DeserializeOwned>(
    store: &dyn Store,
    key: &str,
) -> Result<Option<Vec<T>>> {
    let Some(raw) = store
        .get(key)
        .await
        .with_context(|| format!("Failed to read collection {key}"))?
    else {
        return Ok(None);
    };
    let items = serde_json::from_str(&raw)
        .with_context(|| format!("Stored collection {key} is corrupt"))?;
    Ok(Some(items))
}

/// Reads a JSON array stored under `key`. `None` means the key was never written.
async fn read_collection<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Option<Vec<T>> {
    match load_collection(store, key).await {
        Ok(items) => items,
        Err(e) => {
            error!(key, error = ?e, "Failed to read collection");
            Some(Vec::new())
        }
    }
}

async fn write_collection<T: Serialize>(store: &dyn Store, key: &str, items: &[T]) -> Result<()> {
    let json = serde_json::to_string(items)
        .with_context(|| format!("Failed to serialize collection {key}"))?;
    store
        .set(key, json)
        .await
        .with_context(|| format!("Failed to write collection {key}"))
}
