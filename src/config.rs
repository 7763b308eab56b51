// Movie Search Configuration
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which aggregation pipelines back the full-text, autocomplete and facet endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStrategyKind {
    /// No search index logic configured: those endpoints answer with empty results.
    Placeholder,
    /// Atlas Search `$search` / `$searchMeta` pipelines against `search_index_name`.
    Atlas,
}

impl FromStr for SearchStrategyKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "placeholder" | "none" => Ok(Self::Placeholder),
            "atlas" => Ok(Self::Atlas),
            other => bail!("Unknown search strategy: {}", other),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub mongodb_uri: String,
    pub database: String,
    pub collection_name: String,
    pub search_index_name: String,

    pub port: u16,
    pub host: String,

    pub search_strategy: SearchStrategyKind,
    pub fulltext_limit: i64,
}

impl SearchConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary variable source.
    /// Unset and empty variables both fall back to the default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let var_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let mongodb_uri = var("MONGODB_URI").context("MONGODB_URI must be set")?;

        Ok(Self {
            mongodb_uri,
            database: var_or("DATABASE_NAME", "sample_mflix"),
            collection_name: var_or("COLLECTION_NAME", "movies"),
            search_index_name: var_or("SEARCH_INDEX_NAME", "default"),

            port: var_or("PORT", "3000")
                .parse()
                .context("PORT must be a valid port number")?,
            host: var_or("HOST", "localhost"),

            search_strategy: var_or("SEARCH_STRATEGY", "placeholder").parse()?,
            fulltext_limit: var_or("FULLTEXT_LIMIT", "20")
                .parse()
                .context("FULLTEXT_LIMIT must be an integer")?,
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}
