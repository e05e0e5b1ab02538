//! Service trait for the storage collaborator

use crate::core::entity::Entity;
use crate::core::specification::Specification;
use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Service trait for managing stored entities
///
/// Implementations provide CRUD operations for a specific entity type and
/// materialize candidate sets for the query pipeline. The pipeline is
/// agnostic to how they do it.
#[async_trait]
pub trait DataService<T: Entity>: Send + Sync {
    /// Create a new entity
    async fn create(&self, entity: T) -> Result<T>;

    /// Get an entity by ID
    async fn get(&self, id: &Uuid) -> Result<Option<T>>;

    /// List all entities, in insertion order
    async fn list(&self) -> Result<Vec<T>>;

    /// Update an existing entity
    async fn update(&self, id: &Uuid, entity: T) -> Result<T>;

    /// Delete an entity
    async fn delete(&self, id: &Uuid) -> Result<()>;

    /// List the entities satisfying a storage-level specification
    ///
    /// Backends that can translate the criterion tree should do so; the
    /// default evaluates it in memory over [`list`](Self::list).
    async fn find(&self, spec: &Specification<T>) -> Result<Vec<T>> {
        let all = self.list().await?;
        Ok(crate::core::specification::filter(spec, all))
    }
}
