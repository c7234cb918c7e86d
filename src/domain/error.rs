use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HqError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API Error: {0}")]
    Api(String),

    #[error("Invalid input: {0}")]
    Input(String),

    /// Failure of a deduplicated fetch, shared by every waiter on the key
    #[error("{0}")]
    Upstream(Arc<HqError>),
}
