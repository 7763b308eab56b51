// Movie Search Service - HTTP API over a MongoDB movie collection
// Exact-match, full-text, autocomplete and facet search delegated to the database

pub mod api;
pub mod config;
pub mod db;
pub mod errors;
pub mod lifecycle;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;

pub use config::SearchConfig;
pub use db::{Database, DocumentStore};
pub use errors::{SearchError, SearchResult};
pub use lifecycle::{Lifecycle, LifecycleState};
pub use search::QueryGateway;
