//! ServerBuilder for fluent API to build HTTP servers

use super::entity_registry::{ResourceRegistry, ResourceRoutes};
use crate::config::QueryConfig;
use crate::core::entity::Resource;
use crate::core::mapping::PropertyMappingTable;
use crate::core::pipeline::{QueryPipeline, Searchable};
use crate::core::service::DataService;
use anyhow::Result;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Builder for creating HTTP servers with auto-registered resource routes
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new(mappings)
///     .with_config(QueryConfig::default())
///     .register_resource::<Coin, CoinDto>(InMemoryDataService::new())
///     .build()?;
/// ```
pub struct ServerBuilder {
    mappings: Arc<PropertyMappingTable>,
    config: Arc<QueryConfig>,
    registry: ResourceRegistry,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder around a frozen mapping table
    pub fn new(mappings: PropertyMappingTable) -> Self {
        Self {
            mappings: Arc::new(mappings),
            config: Arc::new(QueryConfig::default()),
            registry: ResourceRegistry::new(),
            custom_routes: Vec::new(),
        }
    }

    /// Replace the query configuration
    ///
    /// Applies to every resource, including those registered earlier.
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Add custom routes to the server
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// The pipeline handlers would use with the current configuration
    pub fn pipeline(&self) -> QueryPipeline {
        QueryPipeline::new(self.mappings.clone(), self.config.clone())
    }

    /// Register top-level routes for an entity/resource pair
    pub fn register_resource<E, D>(mut self, service: impl DataService<E> + 'static) -> Self
    where
        E: Searchable,
        D: Resource + for<'a> From<&'a E>,
    {
        self.registry
            .register(Box::new(ResourceRoutes::<E, D>::new(Arc::new(service))));
        self
    }

    /// Register routes for a pair that is also listed under a parent
    ///
    /// `scope_field` is the entity's storage field holding the parent id.
    pub fn register_nested_resource<E, D>(
        mut self,
        service: impl DataService<E> + 'static,
        parent: &'static str,
        scope_field: &'static str,
    ) -> Self
    where
        E: Searchable,
        D: Resource + for<'a> From<&'a E>,
    {
        self.registry.register(Box::new(
            ResourceRoutes::<E, D>::new(Arc::new(service)).nested_under(parent, scope_field),
        ));
        self
    }

    /// Build the final router
    pub fn build(self) -> Result<Router> {
        self.config.validate()?;

        let pipeline = self.pipeline();
        let mut app = Self::health_routes().merge(self.registry.build_routes(&pipeline));
        for custom_router in self.custom_routes {
            app = app.merge(custom_router);
        }

        tracing::debug!(
            resources = ?self.registry.resource_names(),
            "router built"
        );

        Ok(app.layer(TraceLayer::new_for_http()))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Build health check routes
    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    /// Health check endpoint handler
    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "shelf-rs"
        }))
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
