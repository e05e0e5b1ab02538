//! Query pipeline: validate, filter, sort, page and shape a resource listing
//!
//! The pipeline performs no I/O. The storage collaborator materializes the
//! candidates (already narrowed by storage-level filters such as collection
//! membership) and the pipeline turns them into one shaped page.
//!
//! ```text
//! params ──► validate orderBy ──► validate fields ──► search ──► sort ──► page ──► shape
//! ```

use crate::config::QueryConfig;
use crate::core::entity::{Entity, Resource};
use crate::core::error::{ConfigError, QueryError, ShelfError};
use crate::core::field::FieldValue;
use crate::core::mapping::{PropertyMappingTable, SortKey, short_type_name};
use crate::core::query::{PagedResult, PaginationMeta, ResourceQueryParameters};
use crate::core::shaping::{ShapedRecord, shape_many, type_has_properties};
use crate::core::specification::{Specification, filter};
use std::cmp::Ordering;
use std::sync::Arc;

/// Entities that carry a free-text search
///
/// Which fields take part is a per-resource choice; most resources build it
/// with [`Specification::any_contains`].
pub trait Searchable: Entity {
    /// Specification matching entities relevant to `term`
    fn search_specification(term: &str) -> Specification<Self>;
}

/// Result of one pipeline run
#[derive(Debug, Clone)]
pub struct QueryOutcome<T> {
    /// The page's items, projected onto the requested fields
    pub records: Vec<ShapedRecord>,

    /// The unshaped page and its counts
    pub page: PagedResult<T>,
}

impl<T> QueryOutcome<T> {
    pub fn metadata(&self) -> PaginationMeta {
        self.page.metadata()
    }
}

/// Orchestrates sort-key mapping, specifications, paging and shaping
///
/// Cheap to clone: the mapping table and configuration are shared.
#[derive(Debug, Clone)]
pub struct QueryPipeline {
    mappings: Arc<PropertyMappingTable>,
    config: Arc<QueryConfig>,
}

impl QueryPipeline {
    pub fn new(mappings: Arc<PropertyMappingTable>, config: Arc<QueryConfig>) -> Self {
        Self { mappings, config }
    }

    pub fn mappings(&self) -> &PropertyMappingTable {
        &self.mappings
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Check client input against the resource/entity pair
    ///
    /// Runs before any filtering or sorting so that rejected requests do no work.
    pub fn validate<E, D>(&self, params: &ResourceQueryParameters) -> Result<(), ShelfError>
    where
        E: Entity,
        D: Resource,
    {
        let mapping = self.mappings.mapping_for::<D, E>().inspect_err(|err| {
            tracing::error!(error = %err, resource = D::resource_name(), "query pipeline misconfigured");
        })?;

        if !mapping.is_valid(params.order_by()) {
            tracing::warn!(
                resource = D::resource_name(),
                order_by = params.order_by().unwrap_or_default(),
                "rejected sort key"
            );
            return Err(QueryError::InvalidSortKey {
                resource: D::resource_name().to_string(),
                order_by: params.order_by().unwrap_or_default().to_string(),
            }
            .into());
        }

        if !type_has_properties::<D>(params.fields()) {
            tracing::warn!(
                resource = D::resource_name(),
                fields = params.fields().unwrap_or_default(),
                "rejected field selection"
            );
            return Err(QueryError::InvalidFieldSelection {
                resource: D::resource_name().to_string(),
                fields: params.fields().unwrap_or_default().to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Run the pipeline over `candidates`
    ///
    /// Applies the entity's free-text search when `search` is set.
    pub fn run<E, D>(
        &self,
        params: &ResourceQueryParameters,
        candidates: Vec<E>,
    ) -> Result<QueryOutcome<E>, ShelfError>
    where
        E: Searchable,
        D: Resource + for<'a> From<&'a E>,
    {
        let search = params.search().map(E::search_specification);
        self.run_filtered::<E, D>(params, candidates, search.as_ref())
    }

    /// Run the pipeline with an explicit specification instead of the
    /// entity's search
    ///
    /// `None` keeps every candidate.
    pub fn run_filtered<E, D>(
        &self,
        params: &ResourceQueryParameters,
        candidates: Vec<E>,
        spec: Option<&Specification<E>>,
    ) -> Result<QueryOutcome<E>, ShelfError>
    where
        E: Entity,
        D: Resource + for<'a> From<&'a E>,
    {
        let params = params.normalized(&self.config);
        self.validate::<E, D>(&params)?;

        let candidate_count = candidates.len();
        let filtered = match spec {
            Some(spec) => filter(spec, candidates),
            None => candidates,
        };

        let keys = self
            .mappings
            .resolve::<D, E>(params.order_by())
            .inspect_err(|err| tracing::error!(error = %err, "sort key resolution failed"))?;
        let sorted = sort_by_keys(filtered, &keys)
            .inspect_err(|err| tracing::error!(error = %err, "sort key resolution failed"))?;

        let page = PagedResult::create_with_limit(
            sorted,
            params.page,
            params.page_size(),
            self.config.max_page_size,
        );

        let dtos: Vec<D> = page.items().iter().map(D::from).collect();
        let records = shape_many(&dtos, params.fields());

        tracing::debug!(
            resource = D::resource_name(),
            order_by = params.order_by().unwrap_or_default(),
            fields = params.fields().unwrap_or_default(),
            search = spec.map(|spec| spec.name()).unwrap_or_default(),
            page = page.current_page(),
            page_size = page.page_size(),
            candidates = candidate_count,
            matched = page.total_count(),
            "query pipeline run"
        );

        Ok(QueryOutcome { records, page })
    }
}

/// Stable multi-key sort over entity storage fields
///
/// The first key is primary and later keys break ties. Items equal on every
/// key keep their input order. A key naming a field the entity does not
/// have is a mapping bug and fails with [`ConfigError::UnknownEntityField`].
pub fn sort_by_keys<E: Entity>(items: Vec<E>, keys: &[SortKey]) -> Result<Vec<E>, ConfigError> {
    if keys.is_empty() {
        return Ok(items);
    }

    let mut keyed = items
        .into_iter()
        .map(|item| {
            let values = keys
                .iter()
                .map(|key| {
                    item.field_value(&key.field)
                        .map(FieldValue::folded)
                        .ok_or_else(|| ConfigError::UnknownEntityField {
                            field: key.field.clone(),
                            entity: short_type_name::<E>().to_string(),
                        })
                })
                .collect::<Result<Vec<FieldValue>, _>>()?;
            Ok((values, item))
        })
        .collect::<Result<Vec<_>, ConfigError>>()?;

    keyed.sort_by(|(left, _), (right, _)| compare_keyed(left, right, keys));

    Ok(keyed.into_iter().map(|(_, item)| item).collect())
}

fn compare_keyed(left: &[FieldValue], right: &[FieldValue], keys: &[SortKey]) -> Ordering {
    for ((left, right), key) in left.iter().zip(right).zip(keys) {
        let ordering = left.compare_folded(right);
        let ordering = if key.descending {
            ordering.reverse()
        } else {
            ordering
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
