// Search Module
pub mod gateway;
pub mod pipelines;
pub mod types;


pub use gateway::QueryGateway;
pub use pipelines::{pipelines_for, AtlasSearchPipelines, PlaceholderPipelines, SearchPipelines};
pub use types::{ExactField, ExactSearchBody, QueryBody, SearchRequest, SortKey};
