use super::{load_collection, read_collection, write_collection};
use crate::core::model::Transaction;
use crate::core::store::Store;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, instrument};

pub const TRANSACTIONS_KEY: &str = "transactions_v1";

/// Transactions stored newest first.
pub struct TransactionRepository {
    store: Arc<dyn Store>,
}

impl TransactionRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<Transaction> {
        read_collection(self.store.as_ref(), TRANSACTIONS_KEY)
            .await
            .unwrap_or_default()
    }

    pub async fn find(&self, id: &str) -> Option<Transaction> {
        self.list().await.into_iter().find(|t| t.id == id)
    }

    async fn load(&self) -> Result<Vec<Transaction>> {
        Ok(load_collection(self.store.as_ref(), TRANSACTIONS_KEY)
            .await?
            .unwrap_or_default())
    }

    #[instrument(skip(self, transaction), fields(id = %transaction.id))]
    pub async fn create(&self, transaction: Transaction) -> Result<()> {
        let mut transactions = self.load().await?;
        transactions.insert(0, transaction);
        write_collection(self.store.as_ref(), TRANSACTIONS_KEY, &transactions).await
    }

    /// Replaces the transaction with the same id, keeping its position.
    #[instrument(skip(self, transaction), fields(id = %transaction.id))]
    pub async fn update(&self, transaction: Transaction) -> Result<()> {
        let mut transactions = self.load().await?;
        let Some(slot) = transactions.iter_mut().find(|t| t.id == transaction.id) else {
            debug!("No transaction to update");
            return Ok(());
        };
        *slot = transaction;
        write_collection(self.store.as_ref(), TRANSACTIONS_KEY, &transactions).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut transactions = self.load().await?;
        transactions.retain(|t| t.id != id);
        write_collection(self.store.as_ref(), TRANSACTIONS_KEY, &transactions).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.remove(TRANSACTIONS_KEY).await
    }
}
