//! Coordinate primitives used by the session's focus math.

/// A WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// An axis-aligned region covering a set of positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    /// The degenerate bounds containing a single point.
    pub fn of(point: LatLng) -> Self {
        Self {
            south_west: point,
            north_east: point,
        }
    }

    /// Grows the bounds to include `point`.
    pub fn extend(&mut self, point: LatLng) {
        self.south_west.lat = self.south_west.lat.min(point.lat);
        self.south_west.lng = self.south_west.lng.min(point.lng);
        self.north_east.lat = self.north_east.lat.max(point.lat);
        self.north_east.lng = self.north_east.lng.max(point.lng);
    }

    /// Bounds covering every point in the iterator, or `None` when empty.
    pub fn from_points(points: impl IntoIterator<Item = LatLng>) -> Option<Self> {
        let mut points = points.into_iter();
        let mut bounds = Self::of(points.next()?);
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn contains(&self, point: LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_of_empty_is_none() {
        assert_eq!(LatLngBounds::from_points([]), None);
    }

    #[test]
    fn from_points_covers_all_inputs() {
        let points = [
            LatLng::new(33.756, -84.376),
            LatLng::new(33.688, -84.392),
            LatLng::new(33.762, -84.370),
        ];
        let bounds = LatLngBounds::from_points(points).unwrap();

        assert_eq!(bounds.south_west, LatLng::new(33.688, -84.392));
        assert_eq!(bounds.north_east, LatLng::new(33.762, -84.370));
        for point in points {
            assert!(bounds.contains(point));
        }
    }
}
