// Movie Search Error Types
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub type SearchResult<T> = Result<T, SearchError>;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Request rejected before any query was issued.
    #[error("{message}")]
    Validation {
        message: String,
        example: Option<Value>,
    },

    #[error(transparent)]
    Database(#[from] mongodb::error::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SearchError {
    pub fn validation(message: impl Into<String>) -> Self {
        SearchError::Validation {
            message: message.into(),
            example: None,
        }
    }

    pub fn validation_with_example(message: impl Into<String>, example: Value) -> Self {
        SearchError::Validation {
            message: message.into(),
            example: Some(example),
        }
    }
}

/// JSON body returned for every failed request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

impl ResponseError for SearchError {
    fn status_code(&self) -> StatusCode {
        match self {
            SearchError::Validation { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            SearchError::Validation { message, example } => ErrorResponse {
                error: message.clone(),
                example: example.clone(),
            },
            _ => ErrorResponse {
                error: self.to_string(),
                example: None,
            },
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
