//! Resource registry for managing resource descriptors and auto-generating read routes

use crate::core::entity::{Entity, Resource};
use crate::core::pipeline::{QueryPipeline, Searchable};
use crate::core::service::DataService;
use crate::server::rest::{ResourceState, get_resource, list_resources, list_scoped_resources};
use axum::{Router, routing::get};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

/// Trait that describes how to build routes for a resource
pub trait ResourceDescriptor: Send + Sync {
    /// The resource name (plural, e.g., "coins")
    fn resource_name(&self) -> &str;

    /// Build the read routes for this resource, served by `pipeline`
    ///
    /// Should return a Router with routes like:
    /// - GET /{plural}
    /// - GET /{plural}/{id}
    fn build_routes(&self, pipeline: &QueryPipeline) -> Router;
}

/// Routes for one entity/resource pair
///
/// - `GET /{plural}`: searched, sorted, paged and shaped listing
/// - `GET /{plural}/{id}`: one shaped record
/// - `GET /{parent}/{id}/{plural}`: listing scoped to a parent, when configured
///
/// The pipeline is supplied when routes are built, so every resource serves
/// with the configuration the server was finally built with.
pub struct ResourceRoutes<E: Entity, D> {
    service: Arc<dyn DataService<E>>,
    nesting: Option<(&'static str, &'static str)>,
    _resource: PhantomData<fn() -> D>,
}

impl<E: Entity, D> ResourceRoutes<E, D> {
    pub fn new(service: Arc<dyn DataService<E>>) -> Self {
        Self {
            service,
            nesting: None,
            _resource: PhantomData,
        }
    }

    /// Also serve the listing nested under `parent`, filtered by `scope_field`
    pub fn nested_under(mut self, parent: &'static str, scope_field: &'static str) -> Self {
        self.nesting = Some((parent, scope_field));
        self
    }
}

impl<E, D> ResourceDescriptor for ResourceRoutes<E, D>
where
    E: Searchable,
    D: Resource + for<'a> From<&'a E>,
{
    fn resource_name(&self) -> &str {
        E::resource_name()
    }

    fn build_routes(&self, pipeline: &QueryPipeline) -> Router {
        let plural = E::resource_name();
        let mut state = ResourceState::<E, D>::new(self.service.clone(), pipeline.clone());

        let mut router = Router::new()
            .route(&format!("/{}", plural), get(list_resources::<E, D>))
            .route(&format!("/{}/{{id}}", plural), get(get_resource::<E, D>));

        if let Some((parent, scope_field)) = self.nesting {
            state = state.scoped_by(scope_field);
            router = router.route(
                &format!("/{}/{{id}}/{}", parent, plural),
                get(list_scoped_resources::<E, D>),
            );
        }

        router.with_state(state)
    }
}

/// Registry for all resources in the application
///
/// This registry collects resource descriptors and can generate a router
/// with all of their routes.
#[derive(Default)]
pub struct ResourceRegistry {
    descriptors: HashMap<String, Box<dyn ResourceDescriptor>>,
}

impl ResourceRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            descriptors: HashMap::new(),
        }
    }

    /// Register a resource descriptor
    ///
    /// The resource name will be used as the key.
    pub fn register(&mut self, descriptor: Box<dyn ResourceDescriptor>) {
        let name = descriptor.resource_name().to_string();
        self.descriptors.insert(name, descriptor);
    }

    /// Build a router with all registered resource routes
    pub fn build_routes(&self, pipeline: &QueryPipeline) -> Router {
        let mut router = Router::new();

        for descriptor in self.descriptors.values() {
            router = router.merge(descriptor.build_routes(pipeline));
        }

        router
    }

    /// Get all registered resource names
    pub fn resource_names(&self) -> Vec<&str> {
        self.descriptors.keys().map(|s| s.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal mock ResourceDescriptor for testing
    struct MockDescriptor {
        name: String,
    }

    impl ResourceDescriptor for MockDescriptor {
        fn resource_name(&self) -> &str {
            &self.name
        }

        fn build_routes(&self, _pipeline: &QueryPipeline) -> Router {
            Router::new()
        }
    }

    fn mock(name: &str) -> Box<dyn ResourceDescriptor> {
        Box::new(MockDescriptor {
            name: name.to_string(),
        })
    }

    #[test]
    fn test_new_registry_is_empty() {
        let registry = ResourceRegistry::new();
        assert!(registry.resource_names().is_empty());
    }

    #[test]
    fn test_register_resources() {
        let mut registry = ResourceRegistry::new();
        registry.register(mock("coins"));
        registry.register(mock("banknotes"));

        let mut names = registry.resource_names();
        names.sort();
        assert_eq!(names, vec!["banknotes", "coins"]);
    }

    #[test]
    fn test_register_same_name_replaces() {
        let mut registry = ResourceRegistry::new();
        registry.register(mock("coins"));
        registry.register(mock("coins"));
        assert_eq!(registry.resource_names().len(), 1);
    }
}
