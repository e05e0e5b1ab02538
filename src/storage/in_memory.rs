//! In-memory implementation of DataService for testing and development

use crate::core::entity::Entity;
use crate::core::error::StorageError;
use crate::core::service::DataService;
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory data service implementation
///
/// Useful for testing and development. Uses RwLock for thread-safe access
/// and keeps entities in insertion order.
#[derive(Clone)]
pub struct InMemoryDataService<T: Entity> {
    entities: Arc<RwLock<IndexMap<Uuid, T>>>,
}

impl<T: Entity> InMemoryDataService<T> {
    /// Create a new, empty in-memory data service
    pub fn new() -> Self {
        Self {
            entities: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Create a service pre-populated with `entities`
    pub fn with_entities(entities: impl IntoIterator<Item = T>) -> Self {
        Self {
            entities: Arc::new(RwLock::new(
                entities
                    .into_iter()
                    .map(|entity| (entity.id(), entity))
                    .collect(),
            )),
        }
    }
}

impl<T: Entity> Default for InMemoryDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> DataService<T> for InMemoryDataService<T> {
    async fn create(&self, entity: T) -> Result<T> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        entities.insert(entity.id(), entity.clone());

        Ok(entity)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<T>> {
        let entities = self
            .entities
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(entities.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        let entities = self
            .entities
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(entities.values().cloned().collect())
    }

    async fn update(&self, id: &Uuid, entity: T) -> Result<T> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        let slot = entities.get_mut(id).ok_or_else(|| StorageError::NotFound {
            resource: T::resource_name().to_string(),
            id: *id,
        })?;
        *slot = entity.clone();

        Ok(entity)
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        entities.shift_remove(id);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::specification::Specification;

    crate::impl_entity!(Token, "token", "tokens", {
        issuer: String,
        collection_id: Uuid,
    });

    fn token(issuer: &str, collection_id: Uuid) -> Token {
        Token {
            id: Uuid::new_v4(),
            issuer: issuer.to_string(),
            collection_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let service = InMemoryDataService::new();
        let created = service.create(token("Royal Mint", Uuid::nil())).await.unwrap();

        let retrieved = service.get(&created.id).await.unwrap();
        assert!(retrieved.is_some());
        assert_eq!(retrieved.unwrap().issuer, "Royal Mint");
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let service = InMemoryDataService::new();
        let first = service.create(token("B", Uuid::nil())).await.unwrap();
        let second = service.create(token("A", Uuid::nil())).await.unwrap();

        let ids: Vec<Uuid> = service.list().await.unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_update() {
        let original = token("Royal Mint", Uuid::nil());
        let service = InMemoryDataService::with_entities([original.clone()]);

        let mut changed = original.clone();
        changed.issuer = "Perth Mint".to_string();
        service.update(&original.id, changed).await.unwrap();

        let retrieved = service.get(&original.id).await.unwrap().unwrap();
        assert_eq!(retrieved.issuer, "Perth Mint");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let service = InMemoryDataService::<Token>::new();
        let missing = token("Royal Mint", Uuid::nil());

        let err = service.update(&missing.id, missing.clone()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StorageError>(),
            Some(StorageError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let kept = token("A", Uuid::nil());
        let removed = token("B", Uuid::nil());
        let service = InMemoryDataService::with_entities([kept.clone(), removed.clone()]);

        service.delete(&removed.id).await.unwrap();

        assert!(service.get(&removed.id).await.unwrap().is_none());
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_specification() {
        let collection = Uuid::new_v4();
        let service = InMemoryDataService::with_entities([
            token("A", collection),
            token("B", Uuid::new_v4()),
            token("C", collection),
        ]);

        let found = service
            .find(&Specification::equals("collection_id", collection))
            .await
            .unwrap();
        let issuers: Vec<&str> = found.iter().map(|t| t.issuer.as_str()).collect();
        assert_eq!(issuers, vec!["A", "C"]);
    }
}
