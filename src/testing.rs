// In-memory document store used by unit tests
use crate::db::DocumentStore;
use crate::errors::{SearchError, SearchResult};
use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Mutex;

/// Evaluates equality filters and descending sorts over a fixed document set.
/// `aggregate` ignores the pipeline contents and returns `aggregate_results`.
#[derive(Default)]
pub struct InMemoryStore {
    documents: Vec<Document>,
    aggregate_results: Vec<Document>,
    failure: Option<String>,
    find_calls: AtomicUsize,
    aggregate_calls: AtomicUsize,
    last_pipeline: Mutex<Option<Vec<Document>>>,
}

impl InMemoryStore {
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents,
            ..Default::default()
        }
    }

    pub fn with_aggregate_results(mut self, results: Vec<Document>) -> Self {
        self.aggregate_results = results;
        self
    }

    /// Every call fails with this message.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(AtomicOrdering::SeqCst)
    }

    pub fn aggregate_calls(&self) -> usize {
        self.aggregate_calls.load(AtomicOrdering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.find_calls() + self.aggregate_calls()
    }

    pub fn last_pipeline(&self) -> Option<Vec<Document>> {
        self.last_pipeline.lock().unwrap().clone()
    }

    fn check_failure(&self) -> SearchResult<()> {
        match &self.failure {
            Some(message) => Err(SearchError::Internal(message.clone())),
            None => Ok(()),
        }
    }
}

/// Resolve a dotted path such as `imdb.rating`.
pub fn lookup<'a>(doc: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut parts = path.split('.');
    let mut current = doc.get(parts.next()?)?;
    for part in parts {
        current = current.as_document()?.get(part)?;
    }
    Some(current)
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(path, expected)| match lookup(doc, path) {
        Some(Bson::Array(items)) => items.contains(expected),
        Some(actual) => actual == expected,
        None => false,
    })
}

fn as_number(value: Option<&Bson>) -> Option<f64> {
    match value? {
        Bson::Int32(v) => Some(*v as f64),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find(&self, filter: Document, sort: Option<Document>) -> SearchResult<Vec<Document>> {
        self.find_calls.fetch_add(1, AtomicOrdering::SeqCst);
        self.check_failure()?;

        let mut results: Vec<Document> = self
            .documents
            .iter()
            .filter(|doc| matches(doc, &filter))
            .cloned()
            .collect();

        if let Some((path, _)) = sort.as_ref().and_then(|s| s.iter().next()) {
            results.sort_by(|a, b| {
                let (a, b) = (as_number(lookup(a, path)), as_number(lookup(b, path)));
                b.partial_cmp(&a).unwrap_or(Ordering::Equal)
            });
        }
        Ok(results)
    }

    async fn aggregate(&self, pipeline: Vec<Document>) -> SearchResult<Vec<Document>> {
        self.aggregate_calls.fetch_add(1, AtomicOrdering::SeqCst);
        *self.last_pipeline.lock().unwrap() = Some(pipeline);
        self.check_failure()?;
        Ok(self.aggregate_results.clone())
    }
}

/// A handful of movie documents shaped like the `sample_mflix.movies` collection.
pub fn sample_movies() -> Vec<Document> {
    use mongodb::bson::doc;

    vec![
        doc! {
            "title": "The Matrix",
            "year": 1999,
            "cast": ["Keanu Reeves", "Laurence Fishburne", "Carrie-Anne Moss"],
            "plot": "A hacker learns the world is a simulation.",
            "imdb": { "rating": 8.7 },
        },
        doc! {
            "title": "The Matrix Reloaded",
            "year": 2003,
            "cast": ["Keanu Reeves", "Laurence Fishburne", "Carrie-Anne Moss"],
            "plot": "Neo and the rebels fight on.",
            "imdb": { "rating": 7.2 },
        },
        doc! {
            "title": "John Wick",
            "year": 2014,
            "cast": ["Keanu Reeves", "Michael Nyqvist"],
            "plot": "A retired hitman seeks vengeance.",
            "imdb": { "rating": 7.3 },
        },
        doc! {
            "title": "Speed",
            "year": 1994,
            "cast": ["Keanu Reeves", "Sandra Bullock"],
            "plot": "A bus must stay above fifty miles an hour.",
            "imdb": { "rating": 7.2 },
        },
        doc! {
            "title": "Heat",
            "year": 1995,
            "cast": ["Al Pacino", "Robert De Niro"],
            "plot": "A detective hunts a crew of thieves.",
            "imdb": { "rating": 8.2 },
        },
    ]
}
