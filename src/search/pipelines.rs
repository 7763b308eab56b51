//! Aggregation pipelines for the search-index backed endpoints.
//!
//! Relevance ranking, autocomplete matching and facet bucketing all run inside
//! the database's search index. This module only decides which pipeline (if
//! any) to send; a strategy returning `None` means the endpoint is not wired
//! to a search index and answers with an empty result.

use crate::config::{SearchConfig, SearchStrategyKind};
use chrono::{TimeZone, Utc};
use mongodb::bson::{doc, Bson, DateTime, Document};
use std::sync::Arc;

pub const SUGGESTION_LIMIT: i64 = 8;
pub const GENRE_BUCKETS: i32 = 3;
pub const RATING_BOUNDARIES: [i32; 4] = [0, 5, 8, 10];
pub const RELEASE_YEAR_BOUNDARIES: [i32; 4] = [2000, 2005, 2015, 2020];
pub const RELEASE_DEFAULT_BUCKET: &str = "older";

/// Supplies the pipelines the query gateway runs for index-backed searches.
pub trait SearchPipelines: Send + Sync {
    fn id(&self) -> &'static str;

    fn full_text(&self, query: &str) -> Option<Vec<Document>>;

    fn autocomplete(&self, query: &str) -> Option<Vec<Document>>;

    fn facets(&self, query: &str) -> Option<Vec<Document>>;
}

/// No search index configured.
#[derive(Debug, Default, Clone)]
pub struct PlaceholderPipelines;

impl SearchPipelines for PlaceholderPipelines {
    fn id(&self) -> &'static str {
        "placeholder"
    }

    fn full_text(&self, _query: &str) -> Option<Vec<Document>> {
        None
    }

    fn autocomplete(&self, _query: &str) -> Option<Vec<Document>> {
        None
    }

    fn facets(&self, _query: &str) -> Option<Vec<Document>> {
        None
    }
}

/// Atlas Search pipelines over a named search index.
#[derive(Debug, Clone)]
pub struct AtlasSearchPipelines {
    index: String,
    fulltext_limit: i64,
}

impl AtlasSearchPipelines {
    pub fn new(index: impl Into<String>, fulltext_limit: i64) -> Self {
        Self {
            index: index.into(),
            fulltext_limit,
        }
    }

    /// Text operator over title, plot and full plot.
    fn text_operator(query: &str) -> Document {
        doc! {
            "text": {
                "query": query,
                "path": ["title", "plot", "fullplot"],
            }
        }
    }

    fn release_boundaries() -> Vec<Bson> {
        RELEASE_YEAR_BOUNDARIES
            .iter()
            .filter_map(|year| Utc.with_ymd_and_hms(*year, 1, 1, 0, 0, 0).single())
            .map(|start| Bson::DateTime(DateTime::from_millis(start.timestamp_millis())))
            .collect()
    }
}

impl SearchPipelines for AtlasSearchPipelines {
    fn id(&self) -> &'static str {
        "atlas"
    }

    fn full_text(&self, query: &str) -> Option<Vec<Document>> {
        let mut search = Self::text_operator(query);
        search.insert("index", self.index.as_str());

        Some(vec![
            doc! { "$search": search },
            doc! { "$limit": self.fulltext_limit },
            doc! {
                "$project": {
                    "title": 1,
                    "year": 1,
                    "plot": 1,
                    "genres": 1,
                    "cast": 1,
                    "poster": 1,
                    "imdb.rating": 1,
                    "score": { "$meta": "searchScore" },
                }
            },
        ])
    }

    fn autocomplete(&self, query: &str) -> Option<Vec<Document>> {
        Some(vec![
            doc! {
                "$search": {
                    "index": self.index.as_str(),
                    "autocomplete": { "query": query, "path": "title" },
                }
            },
            doc! { "$project": { "title": 1 } },
            doc! { "$limit": SUGGESTION_LIMIT },
        ])
    }

    fn facets(&self, query: &str) -> Option<Vec<Document>> {
        let rating_boundaries: Vec<Bson> =
            RATING_BOUNDARIES.iter().map(|b| Bson::Int32(*b)).collect();

        Some(vec![doc! {
            "$searchMeta": {
                "index": self.index.as_str(),
                "facet": {
                    "operator": Self::text_operator(query),
                    "facets": {
                        "genres": {
                            "type": "string",
                            "path": "genres",
                            "numBuckets": GENRE_BUCKETS,
                        },
                        "ratings": {
                            "type": "number",
                            "path": "imdb.rating",
                            "boundaries": rating_boundaries,
                        },
                        "release_dates": {
                            "type": "date",
                            "path": "released",
                            "boundaries": Self::release_boundaries(),
                            "default": RELEASE_DEFAULT_BUCKET,
                        },
                    },
                },
            }
        }])
    }
}

/// Build the pipeline strategy selected by configuration.
pub fn pipelines_for(config: &SearchConfig) -> Arc<dyn SearchPipelines> {
    match config.search_strategy {
        SearchStrategyKind::Placeholder => Arc::new(PlaceholderPipelines),
        SearchStrategyKind::Atlas => Arc::new(AtlasSearchPipelines::new(
            config.search_index_name.clone(),
            config.fulltext_limit,
        )),
    }
}
