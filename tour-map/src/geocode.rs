//! Address resolution against the public Nominatim lookup service.
//!
//! Entries are resolved strictly one after another. The service is shared
//! and rate-limited, so a fixed delay follows every network lookup; entries
//! that already carry coordinates skip both the request and the delay.

use std::time::Duration;

use async_stream::stream;
use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use tour_content::{Address, Entry};

use crate::error::Error;
use crate::geo::LatLng;

pub const NOMINATIM_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";

/// Identifies this application to the lookup service, per its usage policy.
pub const CLIENT_USER_AGENT: &str = "HistoricalMapApp/1.0";

const REQUEST_DELAY: Duration = Duration::from_secs(1);

/// A resolved, mappable position derived from one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Stop {
    pub name: String,
    pub position: LatLng,
    /// Back-reference to the originating entry, used for marker navigation.
    pub entry_id: i64,
    /// Position in the original entry list, for stable ordering.
    pub source_index: usize,
}

/// One candidate in the service's response. Coordinates arrive as
/// string-encoded decimals.
#[derive(Debug, Deserialize)]
struct Candidate {
    lat: String,
    lon: String,
}

/// Resolves entry addresses into [`Stop`]s.
pub struct Geocoder {
    client: reqwest::Client,
    endpoint: String,
    delay: Duration,
}

impl Geocoder {
    pub fn new() -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(CLIENT_USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            endpoint: NOMINATIM_ENDPOINT.to_string(),
            delay: REQUEST_DELAY,
        })
    }

    /// Points the geocoder at a different endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Overrides the inter-request delay.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Resolves `entries` lazily, in list order.
    ///
    /// Each call is independent; dropping the stream abandons the rest of
    /// the batch. Entries without a resolvable address are skipped with a
    /// warning and leave no gap, so the output may be shorter than the
    /// input. A single failed lookup never aborts the batch.
    pub fn resolve<'a>(&'a self, entries: &'a [Entry]) -> impl Stream<Item = Stop> + 'a {
        stream! {
            for (source_index, entry) in entries.iter().enumerate() {
                let Some(address) = &entry.address else {
                    warn!(entry = %entry.name, "no address for entry, skipping");
                    continue;
                };

                let text = match address {
                    Address::Structured(value) => {
                        if let Some(position) = inline_coordinates(value) {
                            // Direct coordinates: no request, no delay.
                            yield Stop {
                                name: entry.name.clone(),
                                position,
                                entry_id: entry.id,
                                source_index,
                            };
                        } else {
                            warn!(entry = %entry.name, "structured address without coordinates, skipping");
                        }
                        continue;
                    }
                    Address::Text(text) => text,
                };

                match self.lookup(text).await {
                    Ok(Some(position)) => {
                        yield Stop {
                            name: entry.name.clone(),
                            position,
                            entry_id: entry.id,
                            source_index,
                        };
                    }
                    Ok(None) => warn!(address = %text, "no geocoding results"),
                    Err(error) => warn!(address = %text, %error, "geocoding failed"),
                }

                // Nominatim requires at most one request per second.
                tokio::time::sleep(self.delay).await;
            }
        }
    }

    async fn lookup(&self, address: &str) -> Result<Option<LatLng>, Error> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("format", "json"), ("q", address), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        let candidates: Vec<Candidate> = response.json().await?;
        let Some(first) = candidates.first() else {
            return Ok(None);
        };

        match (first.lat.parse::<f64>(), first.lon.parse::<f64>()) {
            (Ok(lat), Ok(lng)) => Ok(Some(LatLng::new(lat, lng))),
            _ => Ok(None),
        }
    }
}

/// Seam between the synchronizer and the geocoder, so tests can substitute
/// a scripted resolver.
#[async_trait]
pub trait Resolver: Send + Sync + 'static {
    async fn resolve_all(&self, entries: Vec<Entry>) -> Vec<Stop>;
}

#[async_trait]
impl Resolver for Geocoder {
    async fn resolve_all(&self, entries: Vec<Entry>) -> Vec<Stop> {
        self.resolve(&entries).collect().await
    }
}

const LAT_KEYS: &[&str] = &["lat", "latitude"];
const LNG_KEYS: &[&str] = &["lng", "lon", "longitude"];

/// Extracts direct coordinates from a structured address.
///
/// Several key spellings are accepted, top-level before nested, first
/// present key wins: `lat`/`latitude`/`coordinates.lat`/
/// `coordinates.latitude`, and `lng`/`lon`/`longitude` with the same
/// nesting.
pub(crate) fn inline_coordinates(address: &Value) -> Option<LatLng> {
    let nested = address.get("coordinates");
    let lat = first_numeric(address, LAT_KEYS)
        .or_else(|| nested.and_then(|object| first_numeric(object, LAT_KEYS)))?;
    let lng = first_numeric(address, LNG_KEYS)
        .or_else(|| nested.and_then(|object| first_numeric(object, LNG_KEYS)))?;
    Some(LatLng::new(lat, lng))
}

fn first_numeric(object: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| object.get(key).and_then(numeric))
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn top_level_keys_win_over_nested() {
        let address = json!({
            "lat": 1.0,
            "lng": 2.0,
            "coordinates": { "lat": 9.0, "lng": 9.0 },
        });
        assert_eq!(inline_coordinates(&address), Some(LatLng::new(1.0, 2.0)));
    }

    #[test]
    fn lng_beats_lon_beats_longitude() {
        let address = json!({ "lat": 1.0, "lng": 2.0, "lon": 3.0, "longitude": 4.0 });
        assert_eq!(inline_coordinates(&address), Some(LatLng::new(1.0, 2.0)));

        let address = json!({ "lat": 1.0, "lon": 3.0, "longitude": 4.0 });
        assert_eq!(inline_coordinates(&address), Some(LatLng::new(1.0, 3.0)));
    }

    #[test]
    fn nested_coordinates_are_accepted() {
        let address = json!({ "coordinates": { "latitude": 33.7, "lon": -84.4 } });
        assert_eq!(
            inline_coordinates(&address),
            Some(LatLng::new(33.7, -84.4))
        );
    }

    #[test]
    fn string_encoded_numbers_are_parsed() {
        let address = json!({ "lat": "33.756", "lng": "-84.376" });
        assert_eq!(
            inline_coordinates(&address),
            Some(LatLng::new(33.756, -84.376))
        );
    }

    #[test]
    fn one_missing_axis_means_no_coordinates() {
        assert_eq!(inline_coordinates(&json!({ "lat": 33.7 })), None);
        assert_eq!(inline_coordinates(&json!({ "lng": -84.4 })), None);
        assert_eq!(inline_coordinates(&json!({ "city": "Atlanta" })), None);
    }
}
