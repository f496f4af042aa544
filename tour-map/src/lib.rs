//! Geocoding and map synchronization for the tour application.
//!
//! `tour-map` turns a list of content entries into positioned map markers
//! and keeps them in sync with user selection. The map rendering engine is
//! an external, separately loaded library; this crate manages its lifecycle
//! and drives it through a small [`MapEngine`] interface.
//!
//! # Pieces
//!
//! - [`ResourceLoader`] — loads the engine's script/stylesheet pair at most
//!   once per process, no matter how many views mount.
//! - [`Geocoder`] — resolves entry addresses into [`Stop`]s, sequentially
//!   and rate-limited to respect the shared public lookup service.
//! - [`MapSession`] — owns the live engine instance and its marker set.
//! - [`Synchronizer`] — orchestrates the three, discarding geocode results
//!   that a newer entry list has superseded.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tour_map::{Geocoder, MapSession, Synchronizer, TracingEngine};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let content = tour_content::ContentClient::new("http://127.0.0.1:8000");
//!     let entries = content.all_entries().await?;
//!
//!     let session = MapSession::new(TracingEngine::default());
//!     let sync = Synchronizer::spawn(session, Arc::new(Geocoder::new()?));
//!
//!     sync.set_entries(entries);
//!     sync.session_ready();
//!     sync.set_selection(Some(0));
//!
//!     sync.close().await;
//!     Ok(())
//! }
//! ```

mod engine;
mod error;
mod geo;
mod geocode;
mod loader;
mod session;
mod sync;

pub use engine::{MapEngine, MarkerSpec, TracingEngine, Transition, FOCUS_TRANSITION};
pub use error::Error;
pub use geo::{LatLng, LatLngBounds};
pub use geocode::{Geocoder, Resolver, Stop, CLIENT_USER_AGENT, NOMINATIM_ENDPOINT};
pub use loader::{
    ResourceHost, ResourceLoader, LEAFLET_CSS_URL, LEAFLET_JS_URL, TILE_ATTRIBUTION,
    TILE_URL_TEMPLATE,
};
pub use session::{
    MapSession, DEFAULT_CENTER, DEFAULT_ZOOM, FIT_PADDING, FOCUS_ZOOM, MAX_ZOOM,
};
pub use sync::Synchronizer;
