use axum::async_trait;
use shared::Item;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{ItemPatch, ItemStore, StoreError};

/// Process-local store. Backs tests and `--dev-mode` without a database.
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    items: RwLock<HashMap<String, Item>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn put_new(&self, item: &Item) -> Result<(), StoreError> {
        let mut items = self.items.write().await;
        if items.contains_key(&item.id) {
            return Err(StoreError::condition_failed(&item.id));
        }
        items.insert(item.id.clone(), item.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.items.read().await.values().cloned().collect())
    }

    async fn update_existing(&self, id: &str, patch: &ItemPatch) -> Result<Item, StoreError> {
        let mut items = self.items.write().await;
        let item = items
            .get_mut(id)
            .ok_or_else(|| StoreError::condition_failed(id))?;
        patch.apply(item);
        Ok(item.clone())
    }

    async fn delete_existing(&self, id: &str) -> Result<(), StoreError> {
        match self.items.write().await.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::condition_failed(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn item(id: &str, name: &str) -> Item {
        let now = Utc::now();
        Item {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn put_new_rejects_existing_id() {
        let store = MemoryItemStore::new();
        store.put_new(&item("a", "Lamp")).await.unwrap();

        let err = store.put_new(&item("a", "Chair")).await.unwrap_err();
        assert!(matches!(err, StoreError::ConditionFailed { id } if id == "a"));

        let kept = store.get("a").await.unwrap().unwrap();
        assert_eq!(kept.name, "Lamp");
    }

    #[tokio::test]
    async fn scan_returns_everything() {
        let store = MemoryItemStore::new();
        assert!(store.scan().await.unwrap().is_empty());

        store.put_new(&item("a", "Lamp")).await.unwrap();
        store.put_new(&item("b", "Chair")).await.unwrap();

        let mut names: Vec<String> = store
            .scan()
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["Chair", "Lamp"]);
    }

    #[tokio::test]
    async fn update_missing_item_fails_without_inserting() {
        let store = MemoryItemStore::new();
        let patch = ItemPatch::new(Utc::now()).with_name("Ghost");

        let err = store.update_existing("nope", &patch).await.unwrap_err();
        assert!(matches!(err, StoreError::ConditionFailed { .. }));
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn update_returns_full_item() {
        let store = MemoryItemStore::new();
        let original = item("a", "Lamp");
        store.put_new(&original).await.unwrap();

        let later = original.created_at + Duration::seconds(1);
        let updated = store
            .update_existing("a", &ItemPatch::new(later).with_description("brass"))
            .await
            .unwrap();

        assert_eq!(updated.id, "a");
        assert_eq!(updated.name, "Lamp");
        assert_eq!(updated.description.as_deref(), Some("brass"));
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.updated_at, later);
        assert_eq!(store.get("a").await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn delete_is_conditional() {
        let store = MemoryItemStore::new();
        store.put_new(&item("a", "Lamp")).await.unwrap();

        store.delete_existing("a").await.unwrap();
        assert!(store.get("a").await.unwrap().is_none());

        let err = store.delete_existing("a").await.unwrap_err();
        assert!(matches!(err, StoreError::ConditionFailed { .. }));
    }
}
