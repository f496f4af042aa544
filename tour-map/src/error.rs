//! Error types for map and geocoding operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to load resource {url}: {reason}")]
    ResourceLoad { url: String, reason: String },

    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("geocoding service returned {0}")]
    Status(reqwest::StatusCode),
}
