//! The live map instance and its marker set for one mounted view.

use tracing::debug;

use crate::engine::{MapEngine, MarkerSpec, FOCUS_TRANSITION};
use crate::geo::{LatLng, LatLngBounds};
use crate::geocode::Stop;

/// Downtown Atlanta, shown until stops resolve.
pub const DEFAULT_CENTER: LatLng = LatLng::new(33.745, -84.39);
pub const DEFAULT_ZOOM: f64 = 12.0;
/// Zoom used when focusing a single selected stop.
pub const FOCUS_ZOOM: f64 = 17.0;
pub const MAX_ZOOM: f64 = 19.0;
/// Pixel margin kept around fitted bounds.
pub const FIT_PADDING: f64 = 48.0;

/// Owns the engine instance and the markers added to it.
///
/// Markers never outlive the session: `set_markers` removes the previous
/// set before adding the new one, and `close` removes them before the
/// engine goes away. Calls made before [`open`](Self::open) are silent
/// no-ops — during the resource-loading race they are expected, not a
/// fault.
pub struct MapSession<E: MapEngine> {
    engine: E,
    markers: Vec<E::MarkerHandle>,
    open: bool,
}

impl<E: MapEngine> MapSession<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            markers: Vec::new(),
            open: false,
        }
    }

    /// Creates the engine's map instance, exactly once per session.
    pub fn open(&mut self, center: LatLng) {
        if self.open {
            return;
        }
        self.engine.open(center, DEFAULT_ZOOM);
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Replaces the whole marker set with one numbered marker per stop.
    ///
    /// Safe with an empty slice: all markers are removed, none added.
    pub fn set_markers(&mut self, stops: &[Stop]) {
        if !self.open {
            debug!("set_markers before map open, ignoring");
            return;
        }
        for handle in self.markers.drain(..) {
            self.engine.remove_marker(handle);
        }
        for (index, stop) in stops.iter().enumerate() {
            let handle = self.engine.add_marker(MarkerSpec {
                position: stop.position,
                label: index + 1,
                entry_id: stop.entry_id,
            });
            self.markers.push(handle);
        }
    }

    /// Moves the view to the selection, or to fit all stops when none.
    ///
    /// A single stop is centered directly; two or more get padded bounds.
    /// An out-of-range selection is ignored.
    pub fn focus(&mut self, selection: Option<usize>, stops: &[Stop]) {
        if !self.open {
            debug!("focus before map open, ignoring");
            return;
        }
        match selection {
            Some(index) => {
                let Some(stop) = stops.get(index) else {
                    debug!(index, "selection out of range, ignoring");
                    return;
                };
                self.engine.fly_to(stop.position, FOCUS_ZOOM, FOCUS_TRANSITION);
            }
            None => match stops {
                [] => {}
                [only] => self.engine.fly_to(only.position, DEFAULT_ZOOM, FOCUS_TRANSITION),
                _ => {
                    if let Some(bounds) =
                        LatLngBounds::from_points(stops.iter().map(|stop| stop.position))
                    {
                        self.engine.fit_bounds(bounds, FIT_PADDING, FOCUS_TRANSITION);
                    }
                }
            },
        }
    }

    /// Removes all markers and destroys the engine instance.
    pub fn close(&mut self) {
        if !self.open {
            return;
        }
        for handle in self.markers.drain(..) {
            self.engine.remove_marker(handle);
        }
        self.engine.close();
        self.open = false;
    }
}
