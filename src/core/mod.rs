//! Core module containing the query pipeline and its building blocks

pub mod entity;
pub mod error;
pub mod field;
pub mod mapping;
pub mod pipeline;
pub mod query;
pub mod service;
pub mod shaping;
pub mod specification;

pub use entity::{Entity, FieldDescriptor, Resource};
pub use error::{ConfigError, QueryError, ShelfError, StorageError};
pub use field::FieldValue;
pub use mapping::{PropertyMapping, PropertyMappingEntry, PropertyMappingTable, SortKey};
pub use pipeline::{QueryOutcome, QueryPipeline, Searchable};
pub use query::{PagedResult, PaginationMeta, ResourceQueryParameters};
pub use service::DataService;
pub use shaping::ShapedRecord;
pub use specification::{Criterion, CriterionVisitor, Specification};
