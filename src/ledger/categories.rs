use super::{load_collection, read_collection, write_collection};
use crate::core::model::Category;
use crate::core::store::Store;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, instrument};

pub const CATEGORIES_KEY: &str = "categories_v1";

/// User categories. Until the first write, the built-in defaults are served
/// without being persisted.
pub struct CategoryRepository {
    store: Arc<dyn Store>,
}

impl CategoryRepository {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<Category> {
        read_collection(self.store.as_ref(), CATEGORIES_KEY)
            .await
            .unwrap_or_else(|| {
                debug!("No stored categories, serving defaults");
                Category::defaults()
            })
    }

    pub async fn find(&self, id: &str) -> Option<Category> {
        self.list().await.into_iter().find(|c| c.id == id)
    }

    async fn load(&self) -> Result<Vec<Category>> {
        Ok(load_collection(self.store.as_ref(), CATEGORIES_KEY)
            .await?
            .unwrap_or_else(Category::defaults))
    }

    /// Replaces the category with the same id in place, or appends it.
    #[instrument(skip(self, category), fields(id = %category.id))]
    pub async fn save(&self, category: Category) -> Result<()> {
        let mut categories = self.load().await?;
        match categories.iter().position(|c| c.id == category.id) {
            Some(index) => categories[index] = category,
            None => categories.push(category),
        }
        write_collection(self.store.as_ref(), CATEGORIES_KEY, &categories).await
    }

    /// Removes a category by id. Does not check `is_default`; callers must.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut categories = self.load().await?;
        categories.retain(|c| c.id != id);
        write_collection(self.store.as_ref(), CATEGORIES_KEY, &categories).await
    }

    pub async fn clear(&self) -> Result<()> {
        self.store.remove(CATEGORIES_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{EntryType, Icon};
    use crate::ledger::test_support::FailingStore;
    use crate::store::MemoryStore;

    fn repo() -> (CategoryRepository, MemoryStore) {
        let store = MemoryStore::new();
        (CategoryRepository::new(Arc::new(store.clone())), store)
    }

    #[tokio::test]
    async fn test_defaults_on_empty_store() {
        let (repo, store) = repo();

        let categories = repo.list().await;
        assert_eq!(categories, Category::defaults());
        assert!(categories.iter().all(|c| c.is_default));

        // Defaults are not written back
        assert!(store.get(CATEGORIES_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_appends_and_persists_defaults() {
        let (repo, _) = repo();
        let pets = Category::new("Pets", Icon::Heart, EntryType::Expense);

        repo.save(pets.clone()).await.unwrap();

        let categories = repo.list().await;
        assert_eq!(categories.len(), 8);
        assert_eq!(categories.last(), Some(&pets));
        assert_eq!(repo.list().await, categories);
    }

    #[tokio::test]
    async fn test_save_replaces_in_place() {
        let (repo, _) = repo();
        let mut food = repo.find("3").await.unwrap();
        food.name = "Groceries".to_string();
        food.icon = Icon::Cart;

        repo.save(food.clone()).await.unwrap();

        let categories = repo.list().await;
        assert_eq!(categories.len(), 7);
        assert_eq!(categories[2], food);
        assert!(categories[2].is_default);
    }

    #[tokio::test]
    async fn test_delete_is_unconditional() {
        let (repo, _) = repo();
        repo.delete("1").await.unwrap();

        let categories = repo.list().await;
        assert_eq!(categories.len(), 6);
        assert!(repo.find("1").await.is_none());
    }

    #[tokio::test]
    async fn test_delete_everything_does_not_resurrect_defaults() {
        let (repo, _) = repo();
        for category in Category::defaults() {
            repo.delete(&category.id).await.unwrap();
        }
        assert!(repo.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_data_reads_as_empty() {
        let (repo, store) = repo();
        store
            .set(CATEGORIES_KEY, "[{\"id\": 1}]".to_string())
            .await
            .unwrap();
        assert!(repo.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_does_not_overwrite_corrupt_data() {
        let (repo, store) = repo();
        let stored = r#"[{"id":"9","name":"Pets","icon":"heart","type":"expense"},{"id":1}]"#;
        store
            .set(CATEGORIES_KEY, stored.to_string())
            .await
            .unwrap();

        let travel = Category::new("Travel", Icon::Airplane, EntryType::Expense);
        assert!(repo.save(travel).await.is_err());
        assert!(repo.delete("9").await.is_err());
        assert_eq!(
            store.get(CATEGORIES_KEY).await.unwrap().as_deref(),
            Some(stored)
        );
    }

    #[tokio::test]
    async fn test_clear_restores_defaults() {
        let (repo, _) = repo();
        repo.delete("1").await.unwrap();
        repo.clear().await.unwrap();
        assert_eq!(repo.list().await, Category::defaults());
    }

    #[tokio::test]
    async fn test_write_failures_propagate() {
        let repo = CategoryRepository::new(Arc::new(FailingStore {
            fail_reads: false,
            fail_writes: true,
        }));
        let pets = Category::new("Pets", Icon::Heart, EntryType::Expense);
        assert!(repo.save(pets).await.is_err());
        assert!(repo.delete("1").await.is_err());
    }

    #[tokio::test]
    async fn test_read_failure_reads_as_empty() {
        let repo = CategoryRepository::new(Arc::new(FailingStore {
            fail_reads: true,
            fail_writes: false,
        }));
        assert!(repo.list().await.is_empty());
        let pets = Category::new("Pets", Icon::Heart, EntryType::Expense);
        assert!(repo.save(pets).await.is_err());
    }
}
