//! # Shelf
//!
//! Query, sort, page and shape collectible resources for REST backends.
//!
//! ## Features
//!
//! - **Property Mappings**: Public sort keys (`Name`, `OwnerAge`) translate to storage fields,
//!   including multi-field keys and keys that invert the requested direction
//! - **Specifications**: Composable, named predicates that storage layers can translate
//! - **Paging**: Clamped page sizes, full counts and navigation flags
//! - **Field Shaping**: Clients pick the fields they want (`fields=Id,Type`)
//! - **Configuration-Based**: Page limits and extra mappings via YAML configuration
//! - **Type-Safe**: Mappings are keyed by resource/entity type pairs
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shelf::prelude::*;
//!
//! let coins = InMemoryDataService::with_entities([
//!     Coin::new(collection_id, "Pesos", "Mexico", 1.0),
//!     Coin::new(collection_id, "Dollars", "Canada", 2.0),
//! ]);
//!
//! let app = ServerBuilder::new(catalog_mappings()?)
//!     .register_resource::<Coin, CoinDto>(coins)
//!     .build()?;
//!
//! // GET /coins?search=pesos&orderBy=Country desc&fields=Id,Type&page=1&pageSize=5
//! ```

pub mod catalog;
pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        entity::{Entity, FieldDescriptor, Resource},
        error::{ConfigError, QueryError, ShelfError, StorageError},
        field::FieldValue,
        mapping::{PropertyMapping, PropertyMappingEntry, PropertyMappingTable, SortKey},
        pipeline::{QueryOutcome, QueryPipeline, Searchable},
        query::{PagedResult, PaginationMeta, ResourceQueryParameters},
        service::DataService,
        shaping::{ShapedRecord, shape, shape_many, type_has_properties},
        specification::{Criterion, CriterionVisitor, Specification, filter},
    };

    // === Macros ===
    pub use crate::{impl_entity, impl_resource};

    // === Catalog ===
    pub use crate::catalog::{
        Banknote, BanknoteDto, BanknoteSpecs, Coin, CoinDto, CoinSpecs, Collection,
        CollectionDto, CollectionSpecs, catalog_mappings,
    };

    // === Storage ===
    pub use crate::storage::InMemoryDataService;

    // === Config ===
    pub use crate::config::{QueryConfig, SortKeyConfig};

    // === Server ===
    pub use crate::server::{PagedJson, ResourceRegistry, ResourceState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
