//! REST API for movie search
//!
//! Exact-match, full-text, autocomplete and facet endpoints plus health.

pub mod search;


pub use search::{search_routes, AppState};
