// Search request types and request-body validation
use crate::errors::{SearchError, SearchResult};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;

/// Fields an exact-match search may filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExactField {
    Title,
    Cast,
    Plot,
}

impl ExactField {
    pub fn path(&self) -> &'static str {
        match self {
            ExactField::Title => "title",
            ExactField::Cast => "cast",
            ExactField::Plot => "plot",
        }
    }
}

impl FromStr for ExactField {
    type Err = SearchError;

    fn from_str(s: &str) -> SearchResult<Self> {
        match s {
            "title" => Ok(ExactField::Title),
            "cast" => Ok(ExactField::Cast),
            "plot" => Ok(ExactField::Plot),
            other => Err(SearchError::validation_with_example(
                format!("Unsupported field: {}. Expected one of title, cast, plot", other),
                exact_example(),
            )),
        }
    }
}

impl fmt::Display for ExactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Descending sort applied to exact-match results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    Year,
    Rating,
}

impl SortKey {
    /// Document path the sort is applied to.
    pub fn path(&self) -> &'static str {
        match self {
            SortKey::Year => "year",
            SortKey::Rating => "imdb.rating",
        }
    }

    /// `""` means natural order.
    pub fn parse_optional(raw: Option<&str>) -> SearchResult<Option<Self>> {
        match raw {
            None | Some("") => Ok(None),
            Some("year") => Ok(Some(SortKey::Year)),
            Some("rating") => Ok(Some(SortKey::Rating)),
            Some(other) => Err(SearchError::validation_with_example(
                format!("Unsupported sort: {}. Expected year, rating or empty", other),
                exact_example(),
            )),
        }
    }
}

/// A validated search request, one variant per endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchRequest {
    ExactMatch {
        query: String,
        field: ExactField,
        sort: Option<SortKey>,
    },
    FullText {
        query: String,
    },
    Suggestions {
        query: String,
    },
    Facets {
        query: String,
    },
}

impl SearchRequest {
    pub fn query(&self) -> &str {
        match self {
            SearchRequest::ExactMatch { query, .. }
            | SearchRequest::FullText { query }
            | SearchRequest::Suggestions { query }
            | SearchRequest::Facets { query } => query.as_str(),
        }
    }
}

pub const MIN_SUGGESTION_CHARS: usize = 2;

/// Body of `POST /api/search/exact`.
#[derive(Debug, Default, Deserialize)]
pub struct ExactSearchBody {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub sort: Option<String>,
}

/// Body shared by the single-query endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct QueryBody {
    #[serde(default)]
    pub query: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn exact_example() -> serde_json::Value {
    json!({ "query": "The Matrix", "field": "title", "sort": "year" })
}

impl ExactSearchBody {
    pub fn validate(self) -> SearchResult<SearchRequest> {
        let (query, field) = match (non_empty(self.query), non_empty(self.field)) {
            (Some(query), Some(field)) => (query, field),
            _ => {
                return Err(SearchError::validation_with_example(
                    "Query and field are required",
                    exact_example(),
                ))
            }
        };

        Ok(SearchRequest::ExactMatch {
            query,
            field: field.parse()?,
            sort: SortKey::parse_optional(self.sort.as_deref())?,
        })
    }
}

impl QueryBody {
    pub fn into_full_text(self) -> SearchResult<SearchRequest> {
        let query = non_empty(self.query).ok_or_else(|| {
            SearchError::validation_with_example(
                "Query is required",
                json!({ "query": "action adventure" }),
            )
        })?;
        Ok(SearchRequest::FullText { query })
    }

    pub fn into_suggestions(self) -> SearchResult<SearchRequest> {
        match self.query {
            Some(query) if query.chars().count() >= MIN_SUGGESTION_CHARS => {
                Ok(SearchRequest::Suggestions { query })
            }
            _ => Err(SearchError::validation(
                "Query must be at least 2 characters",
            )),
        }
    }

    pub fn into_facets(self) -> SearchResult<SearchRequest> {
        let query = non_empty(self.query).ok_or_else(|| {
            SearchError::validation_with_example("Query is required", json!({ "query": "action" }))
        })?;
        Ok(SearchRequest::Facets { query })
    }
}
