//! HTTP endpoints for movie search.
//!
//! Each handler validates its body into a [`SearchRequest`] before the query
//! gateway is touched, so rejected requests never reach the database.

use actix_web::{error::InternalError, web, HttpResponse};
use chrono::{DateTime, Utc};
use mongodb::bson::{Bson, Document};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use crate::db::document_to_json;
use crate::errors::{ErrorResponse, SearchResult};
use crate::search::{ExactSearchBody, QueryBody, QueryGateway, SearchRequest};

pub const BANNER: &str = "MongoDB Movie Database API is running. Open index.html in your browser.";

/// Application state shared by all workers
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<QueryGateway>,
    pub database: String,
    pub collection: String,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub config: HealthConfig,
}

#[derive(Debug, Serialize)]
pub struct HealthConfig {
    pub database: String,
    pub collection: String,
}

fn documents_response(documents: Vec<Document>) -> HttpResponse {
    let body: Vec<Value> = documents.into_iter().map(document_to_json).collect();
    HttpResponse::Ok().json(body)
}

/// Title of each suggestion document; documents without a string title are skipped.
pub fn suggestion_titles(documents: Vec<Document>) -> Vec<String> {
    documents
        .into_iter()
        .filter_map(|mut doc| match doc.remove("title") {
            Some(Bson::String(title)) => Some(title),
            _ => None,
        })
        .collect()
}

async fn run(state: &AppState, request: SearchRequest) -> SearchResult<Vec<Document>> {
    state.gateway.execute(&request).await.map_err(|e| {
        error!("API error: {}", e);
        e
    })
}

async fn exact_search(
    state: web::Data<AppState>,
    body: web::Json<ExactSearchBody>,
) -> SearchResult<HttpResponse> {
    let request = body.into_inner().validate()?;
    let results = run(&state, request).await?;
    Ok(documents_response(results))
}

async fn suggestions(
    state: web::Data<AppState>,
    body: web::Json<QueryBody>,
) -> SearchResult<HttpResponse> {
    let request = body.into_inner().into_suggestions()?;
    let query = request.query().to_string();
    let titles = suggestion_titles(run(&state, request).await?);

    info!(
        "✓ Autocomplete suggestions: \"{}\" - Found {} suggestions",
        query,
        titles.len()
    );
    Ok(HttpResponse::Ok().json(titles))
}

async fn full_text_search(
    state: web::Data<AppState>,
    body: web::Json<QueryBody>,
) -> SearchResult<HttpResponse> {
    let request = body.into_inner().into_full_text()?;
    let results = run(&state, request).await?;
    Ok(documents_response(results))
}

async fn facet_search(
    state: web::Data<AppState>,
    body: web::Json<QueryBody>,
) -> SearchResult<HttpResponse> {
    let request = body.into_inner().into_facets()?;
    let results = run(&state, request).await?;
    Ok(documents_response(results))
}

async fn health(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "Server is running",
        timestamp: Utc::now(),
        config: HealthConfig {
            database: state.database.clone(),
            collection: state.collection.clone(),
        },
    })
}

async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(BANNER)
}

/// Malformed or mistyped JSON bodies answer 400 with the usual `{error}` shape.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse {
            error: err.to_string(),
            example: None,
        });
        InternalError::from_response(err, response).into()
    })
}

/// Register the search routes
pub fn search_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .route("/api/search/exact", web::post().to(exact_search))
        .route("/api/suggestions", web::post().to(suggestions))
        .route("/api/search/fulltext", web::post().to(full_text_search))
        .route("/api/search/facets", web::post().to(facet_search))
        .route("/api/health", web::get().to(health))
        .route("/", web::get().to(index));
}
