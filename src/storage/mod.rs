//! Storage implementations for the query pipeline's candidate sets

pub mod in_memory;

pub use in_memory::InMemoryDataService;
