//! The seam between this crate and the external map rendering engine.
//!
//! The engine's map and marker objects are stateful handles owned by the
//! engine itself. Everything the subsystem needs from it fits a small
//! interface, which also lets tests drive the session against a recording
//! fake.

use std::time::Duration;

use tracing::{debug, info};

use crate::geo::{LatLng, LatLngBounds};

/// Animation settings shared by every focus transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub duration: Duration,
    pub ease_linearity: f64,
}

/// All focus movements animate identically; engines restart a running
/// animation rather than queueing behind it.
pub const FOCUS_TRANSITION: Transition = Transition {
    duration: Duration::from_millis(800),
    ease_linearity: 0.5,
};

/// Everything needed to place one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: LatLng,
    /// 1-based position shown on the pin.
    pub label: usize,
    /// The entry a click on this marker navigates to.
    pub entry_id: i64,
}

pub trait MapEngine: Send + 'static {
    type MarkerHandle: Send;

    /// Creates the underlying map instance.
    fn open(&mut self, center: LatLng, zoom: f64);

    fn is_open(&self) -> bool;

    fn add_marker(&mut self, spec: MarkerSpec) -> Self::MarkerHandle;

    fn remove_marker(&mut self, handle: Self::MarkerHandle);

    fn fly_to(&mut self, center: LatLng, zoom: f64, transition: Transition);

    fn fit_bounds(&mut self, bounds: LatLngBounds, padding: f64, transition: Transition);

    /// Destroys the map instance and everything it owns.
    fn close(&mut self);
}

/// Headless engine that logs every operation instead of rendering.
///
/// Used by the smoke binary to exercise the pipeline without a browser.
#[derive(Debug, Default)]
pub struct TracingEngine {
    open: bool,
    next_marker: u64,
}

impl MapEngine for TracingEngine {
    type MarkerHandle = u64;

    fn open(&mut self, center: LatLng, zoom: f64) {
        self.open = true;
        info!(lat = center.lat, lng = center.lng, zoom, "map opened");
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn add_marker(&mut self, spec: MarkerSpec) -> u64 {
        self.next_marker += 1;
        info!(
            marker = self.next_marker,
            label = spec.label,
            entry_id = spec.entry_id,
            lat = spec.position.lat,
            lng = spec.position.lng,
            "marker added"
        );
        self.next_marker
    }

    fn remove_marker(&mut self, handle: u64) {
        debug!(marker = handle, "marker removed");
    }

    fn fly_to(&mut self, center: LatLng, zoom: f64, transition: Transition) {
        info!(
            lat = center.lat,
            lng = center.lng,
            zoom,
            duration_ms = transition.duration.as_millis() as u64,
            "flying to position"
        );
    }

    fn fit_bounds(&mut self, bounds: LatLngBounds, padding: f64, transition: Transition) {
        info!(
            south = bounds.south_west.lat,
            west = bounds.south_west.lng,
            north = bounds.north_east.lat,
            east = bounds.north_east.lng,
            padding,
            duration_ms = transition.duration.as_millis() as u64,
            "fitting bounds"
        );
    }

    fn close(&mut self) {
        self.open = false;
        info!("map closed");
    }
}
