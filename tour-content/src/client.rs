//! HTTP client for the backend's entry endpoints.

use crate::error::Error;
use crate::model::{Entry, WireEntry};

/// Read-only client for the content backend.
///
/// The backend exposes `GET /api/all/` for the full entry list and
/// `GET /api/entry/{id}/` for a single entry.
pub struct ContentClient {
    base_url: String,
    client: reqwest::Client,
}

impl ContentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Fetches every entry in the tour, in backend order.
    pub async fn all_entries(&self) -> Result<Vec<Entry>, Error> {
        let url = format!("{}/api/all/", self.base_url);
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        let wire: Vec<WireEntry> = response.json().await?;
        Ok(wire.into_iter().map(Entry::from_wire).collect())
    }

    /// Fetches a single entry by id.
    pub async fn entry(&self, id: i64) -> Result<Entry, Error> {
        let url = format!("{}/api/entry/{}/", self.base_url, id);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound(id));
        }
        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        let wire: WireEntry = response.json().await?;
        Ok(Entry::from_wire(wire))
    }
}
