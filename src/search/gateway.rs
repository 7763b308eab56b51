// Query Gateway - translates each search kind into one collection query
use super::pipelines::SearchPipelines;
use super::types::{ExactField, SearchRequest, SortKey};
use crate::db::DocumentStore;
use crate::errors::SearchResult;
use mongodb::bson::Document;
use std::sync::Arc;
use tracing::{error, info};

pub struct QueryGateway {
    store: Arc<dyn DocumentStore>,
    pipelines: Arc<dyn SearchPipelines>,
}

impl QueryGateway {
    pub fn new(store: Arc<dyn DocumentStore>, pipelines: Arc<dyn SearchPipelines>) -> Self {
        Self { store, pipelines }
    }

    pub fn strategy(&self) -> &'static str {
        self.pipelines.id()
    }

    /// Dispatch a validated request to the matching query.
    pub async fn execute(&self, request: &SearchRequest) -> SearchResult<Vec<Document>> {
        match request {
            SearchRequest::ExactMatch { query, field, sort } => {
                self.exact_match(query, *field, *sort).await
            }
            SearchRequest::FullText { query } => self.full_text(query).await,
            SearchRequest::Suggestions { query } => self.suggestions(query).await,
            SearchRequest::Facets { query } => Ok(self.facets(query).await),
        }
    }

    /// Documents whose `field` equals `query`, newest/highest first when sorted.
    pub async fn exact_match(
        &self,
        query: &str,
        field: ExactField,
        sort: Option<SortKey>,
    ) -> SearchResult<Vec<Document>> {
        let mut filter = Document::new();
        filter.insert(field.path(), query);
        let sort = sort.map(|key| {
            let mut spec = Document::new();
            spec.insert(key.path(), -1);
            spec
        });

        let results = self.store.find(filter, sort).await.map_err(|e| {
            error!("✗ Exact match search error: {}", e);
            e
        })?;

        info!(
            "✓ Exact match search: \"{}\" in field \"{}\" - Found {} results",
            query,
            field,
            results.len()
        );
        Ok(results)
    }

    pub async fn full_text(&self, query: &str) -> SearchResult<Vec<Document>> {
        let results = match self.pipelines.full_text(query) {
            Some(pipeline) => self.store.aggregate(pipeline).await.map_err(|e| {
                error!("✗ Full text search error: {}", e);
                e
            })?,
            None => Vec::new(),
        };

        info!("ℹ Full text search: \"{}\" - Found {} results", query, results.len());
        Ok(results)
    }

    /// Autocomplete candidates; each document carries at least `title`.
    pub async fn suggestions(&self, query: &str) -> SearchResult<Vec<Document>> {
        let results = match self.pipelines.autocomplete(query) {
            Some(pipeline) => self.store.aggregate(pipeline).await.map_err(|e| {
                error!("✗ Autocomplete search error: {}", e);
                e
            })?,
            None => Vec::new(),
        };

        info!("ℹ Autocomplete search: \"{}\" - Found {} results", query, results.len());
        Ok(results)
    }

    /// Facet buckets for `query`. Store faults yield an empty result instead of an error.
    pub async fn facets(&self, query: &str) -> Vec<Document> {
        let results = match self.pipelines.facets(query) {
            Some(pipeline) => match self.store.aggregate(pipeline).await {
                Ok(results) => results,
                Err(e) => {
                    error!("✗ Facet search error (returning empty): {}", e);
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        info!("ℹ Facet search: \"{}\" - Found {} results", query, results.len());
        results
    }
}
