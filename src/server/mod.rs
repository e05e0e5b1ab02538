//! Server module for building HTTP servers with auto-registered resource routes
//!
//! This module provides a `ServerBuilder` that registers, per resource:
//! - a searched, sorted, paged and shaped listing
//! - a shaped single-record route
//! - optionally, a listing nested under a parent resource

pub mod builder;
pub mod entity_registry;
pub mod rest;

pub use builder::ServerBuilder;
pub use entity_registry::{ResourceDescriptor, ResourceRegistry, ResourceRoutes};
pub use rest::{PAGINATION_HEADER, PagedJson, ResourceState};
