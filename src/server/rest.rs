//! REST handlers for listing and fetching shaped resources
//!
//! Handlers are generic over the entity/resource pair; routes for one pair
//! are produced by [`ResourceRoutes`](crate::server::ResourceRoutes).

use crate::core::entity::{Entity, Resource};
use crate::core::error::{QueryError, ShelfError, StorageError};
use crate::core::pipeline::{QueryOutcome, QueryPipeline, Searchable};
use crate::core::query::{PaginatedResponse, PaginationMeta, ResourceQueryParameters};
use crate::core::service::DataService;
use crate::core::shaping::{ShapedRecord, shape, type_has_properties};
use crate::core::specification::Specification;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderName, HeaderValue};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

/// Header carrying pagination metadata as JSON
pub const PAGINATION_HEADER: &str = "x-pagination";

/// State shared by the handlers of one resource
pub struct ResourceState<E: Entity, D> {
    pub service: Arc<dyn DataService<E>>,
    pub pipeline: QueryPipeline,
    /// Storage field that scopes nested listings to a parent
    pub scope_field: Option<&'static str>,
    _resource: PhantomData<fn() -> D>,
}

impl<E: Entity, D> ResourceState<E, D> {
    pub fn new(service: Arc<dyn DataService<E>>, pipeline: QueryPipeline) -> Self {
        Self {
            service,
            pipeline,
            scope_field: None,
            _resource: PhantomData,
        }
    }

    /// Scope nested listings by a storage field holding the parent's id
    pub fn scoped_by(mut self, field: &'static str) -> Self {
        self.scope_field = Some(field);
        self
    }
}

impl<E: Entity, D> Clone for ResourceState<E, D> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            pipeline: self.pipeline.clone(),
            scope_field: self.scope_field,
            _resource: PhantomData,
        }
    }
}

/// A page of shaped records
///
/// Serialized as `{ "data": [...], "pagination": {...} }`, with the
/// pagination metadata repeated in the `X-Pagination` header.
#[derive(Debug)]
pub struct PagedJson {
    pub records: Vec<ShapedRecord>,
    pub pagination: PaginationMeta,
}

impl<T> From<QueryOutcome<T>> for PagedJson {
    fn from(outcome: QueryOutcome<T>) -> Self {
        Self {
            pagination: outcome.metadata(),
            records: outcome.records,
        }
    }
}

impl IntoResponse for PagedJson {
    fn into_response(self) -> Response {
        let header = serde_json::to_string(&self.pagination)
            .ok()
            .and_then(|json| HeaderValue::from_str(&json).ok());

        let mut response = Json(PaginatedResponse {
            data: self.records,
            pagination: self.pagination,
        })
        .into_response();

        if let Some(value) = header {
            response
                .headers_mut()
                .insert(HeaderName::from_static(PAGINATION_HEADER), value);
        }

        response
    }
}

/// Query parameters accepted by single-resource endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShapeParams {
    pub fields: Option<String>,
}

/// GET /{resources}
pub async fn list_resources<E, D>(
    State(state): State<ResourceState<E, D>>,
    Query(params): Query<ResourceQueryParameters>,
) -> Result<PagedJson, ShelfError>
where
    E: Searchable,
    D: Resource + for<'a> From<&'a E>,
{
    // Reject bad input before touching storage
    state
        .pipeline
        .validate::<E, D>(&params.normalized(state.pipeline.config()))?;

    let candidates = state.service.list().await?;
    let outcome = state.pipeline.run::<E, D>(&params, candidates)?;
    Ok(outcome.into())
}

/// GET /{parents}/{parent_id}/{resources}
pub async fn list_scoped_resources<E, D>(
    State(state): State<ResourceState<E, D>>,
    Path(parent_id): Path<Uuid>,
    Query(params): Query<ResourceQueryParameters>,
) -> Result<PagedJson, ShelfError>
where
    E: Searchable,
    D: Resource + for<'a> From<&'a E>,
{
    let Some(scope_field) = state.scope_field else {
        return Err(ShelfError::Internal(format!(
            "{} has no scope field",
            E::resource_name()
        )));
    };

    state
        .pipeline
        .validate::<E, D>(&params.normalized(state.pipeline.config()))?;

    let candidates = state
        .service
        .find(&Specification::equals(scope_field, parent_id))
        .await?;
    let outcome = state.pipeline.run::<E, D>(&params, candidates)?;
    Ok(outcome.into())
}

/// GET /{resources}/{id}
pub async fn get_resource<E, D>(
    State(state): State<ResourceState<E, D>>,
    Path(id): Path<Uuid>,
    Query(params): Query<ShapeParams>,
) -> Result<Json<ShapedRecord>, ShelfError>
where
    E: Entity,
    D: Resource + for<'a> From<&'a E>,
{
    let fields = params.fields.as_deref();
    if !type_has_properties::<D>(fields) {
        return Err(QueryError::InvalidFieldSelection {
            resource: D::resource_name().to_string(),
            fields: fields.unwrap_or_default().to_string(),
        }
        .into());
    }

    let entity = state
        .service
        .get(&id)
        .await?
        .ok_or_else(|| StorageError::NotFound {
            resource: E::resource_name().to_string(),
            id,
        })?;

    Ok(Json(shape(&D::from(&entity), fields)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::query::PagedResult;
    use axum::http::StatusCode;

    #[test]
    fn test_paged_json_sets_pagination_header() {
        let outcome: QueryOutcome<u8> = QueryOutcome {
            records: vec![ShapedRecord::default()],
            page: PagedResult::create(vec![1, 2, 3], 2, 1),
        };

        let response = PagedJson::from(outcome).into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let header = response
            .headers()
            .get(PAGINATION_HEADER)
            .expect("header should be set");
        let meta: PaginationMeta =
            serde_json::from_str(header.to_str().unwrap()).expect("header is JSON");
        assert_eq!(meta.total_count, 3);
        assert_eq!(meta.current_page, 2);
        assert!(meta.has_next);
        assert!(meta.has_previous);
    }
}
