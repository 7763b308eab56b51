//! MongoDB connection handle and the document store the search gateway queries.
//!
//! The gateway only sees [`DocumentStore`]; the live implementation wraps a
//! single driver collection handle, while tests substitute an in-memory store.

use crate::config::SearchConfig;
use crate::errors::SearchResult;
use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::options::FindOptions;
use mongodb::{Client, Collection};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Read-only query interface over the movie collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Run a `find` with an equality filter and optional sort specification.
    async fn find(&self, filter: Document, sort: Option<Document>) -> SearchResult<Vec<Document>>;

    /// Run an aggregation pipeline and drain the cursor.
    async fn aggregate(&self, pipeline: Vec<Document>) -> SearchResult<Vec<Document>>;
}

/// Owns the single driver client for the lifetime of the process.
pub struct Database {
    client: Client,
    collection: Collection<Document>,
}

impl Database {
    /// Open the client and confirm the deployment answers a `ping`.
    pub async fn connect(config: &SearchConfig) -> Result<Self> {
        let client = Client::with_uri_str(&config.mongodb_uri)
            .await
            .context("Invalid MongoDB connection string")?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .context("MongoDB did not answer ping")?;

        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection_name);

        info!("✓ Connected to MongoDB");
        info!("✓ Database: {}", config.database);
        info!("✓ Collection: {}", config.collection_name);

        Ok(Self { client, collection })
    }

    /// Shared handle for the query layer. The client itself stays owned here.
    pub fn store(&self) -> Arc<dyn DocumentStore> {
        Arc::new(MongoStore {
            collection: self.collection.clone(),
        })
    }

    /// Release the client. Consumes the handle so it can only happen once.
    pub async fn close(self) {
        self.client.shutdown().await;
        info!("MongoDB connection closed");
    }
}

struct MongoStore {
    collection: Collection<Document>,
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(&self, filter: Document, sort: Option<Document>) -> SearchResult<Vec<Document>> {
        let mut options = FindOptions::default();
        options.sort = sort;

        let cursor = self.collection.find(filter, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn aggregate(&self, pipeline: Vec<Document>) -> SearchResult<Vec<Document>> {
        let cursor = self.collection.aggregate(pipeline, None).await?;
        Ok(cursor.try_collect().await?)
    }
}

/// Render a stored document as plain JSON.
///
/// ObjectIds become hex strings and dates RFC 3339 strings; everything else
/// follows relaxed extended JSON.
pub fn document_to_json(document: Document) -> Value {
    bson_to_json(Bson::Document(document))
}

fn bson_to_json(value: Bson) -> Value {
    match value {
        Bson::ObjectId(oid) => Value::String(oid.to_hex()),
        Bson::DateTime(dt) => dt
            .try_to_rfc3339_string()
            .map(Value::String)
            .unwrap_or_else(|_| Value::from(dt.timestamp_millis())),
        Bson::Document(doc) => Value::Object(
            doc.into_iter()
                .map(|(key, value)| (key, bson_to_json(value)))
                .collect(),
        ),
        Bson::Array(items) => Value::Array(items.into_iter().map(bson_to_json).collect()),
        other => other.into_relaxed_extjson(),
    }
}
