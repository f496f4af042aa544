//! Error types for content API operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {0}")]
    Status(reqwest::StatusCode),

    #[error("entry {0} not found")]
    NotFound(i64),
}
