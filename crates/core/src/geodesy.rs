//! Geodesic length and area on a spherical Earth
//!
//! All results are in base units: meters for lengths, square meters for areas.
//! Inputs are never modified. Degenerate input (too few points, non-finite
//! coordinates) yields `0.0` instead of an error so callers can always display
//! the value.

use crate::coordinate::GeoPoint;

/// Default sphere radius in meters
///
/// This is the WGS84 semi-major axis used by web map projections, not the
/// 6 371 008.8 m mean Earth radius. Readouts then agree with the map's own
/// scale (a 0.01° equatorial segment is 1113 m). Set
/// [`MeasureConfig::earth_radius_m`](crate::MeasureConfig) for the mean radius.
pub const DEFAULT_EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Spherical Earth model used for measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    radius_m: f64,
}

impl Default for Sphere {
    fn default() -> Self {
        Self {
            radius_m: DEFAULT_EARTH_RADIUS_M,
        }
    }
}

impl Sphere {
    /// Create a sphere with the given radius in meters
    pub fn new(radius_m: f64) -> Self {
        Self { radius_m }
    }

    /// Radius in meters
    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    /// Great-circle distance between two points (haversine)
    pub fn haversine(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        let delta_lat = (b.lat - a.lat).to_radians();
        let delta_lon = (b.lon - a.lon).to_radians();

        let h = (delta_lat / 2.0).sin().powi(2)
            + a.lat_rad().cos() * b.lat_rad().cos() * (delta_lon / 2.0).sin().powi(2);
        // Rounding can push near-antipodal pairs just past 1
        let h = h.clamp(0.0, 1.0);
        let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

        finite_or_zero(self.radius_m * c)
    }

    /// Total length of the path through `points`, in meters
    pub fn distance(&self, points: &[GeoPoint]) -> f64 {
        if points.len() < 2 {
            return 0.0;
        }
        let total: f64 = points
            .windows(2)
            .map(|w| self.haversine(&w[0], &w[1]))
            .sum();
        finite_or_zero(total)
    }

    /// Area enclosed by the ring through `points`, in square meters
    ///
    /// The ring is closed implicitly (last point back to first). Winding order
    /// does not matter. Self-crossing rings are not rejected; the formula's
    /// result is returned as is.
    pub fn area(&self, points: &[GeoPoint]) -> f64 {
        let n = points.len();
        if n < 3 {
            return 0.0;
        }

        // Spherical excess summed per edge
        let mut sum = 0.0;
        for i in 0..n {
            let p1 = &points[i];
            let p2 = &points[(i + 1) % n];
            let delta_lon = wrap_lon(p2.lon - p1.lon).to_radians();
            sum += delta_lon * (2.0 + p1.lat_rad().sin() + p2.lat_rad().sin());
        }

        finite_or_zero((sum * self.radius_m * self.radius_m / 2.0).abs())
    }

    /// Point halfway along the path through `points`
    ///
    /// Interpolates in latitude/longitude within the segment containing the
    /// half-length mark. Returns `None` for an empty path.
    pub fn midpoint_along(&self, points: &[GeoPoint]) -> Option<GeoPoint> {
        let first = *points.first()?;
        let total = self.distance(points);
        if total <= 0.0 {
            return Some(first);
        }

        let half = total / 2.0;
        let mut accumulated = 0.0;
        for w in points.windows(2) {
            let segment = self.haversine(&w[0], &w[1]);
            if segment > 0.0 && accumulated + segment >= half {
                let t = (half - accumulated) / segment;
                return Some(GeoPoint::new(
                    w[0].lat + t * (w[1].lat - w[0].lat),
                    wrap_lon(w[0].lon + t * wrap_lon(w[1].lon - w[0].lon)),
                ));
            }
            accumulated += segment;
        }

        points.last().copied()
    }
}

/// Vertex mean of `points`, used to anchor area labels
pub fn centroid(points: &[GeoPoint]) -> Option<GeoPoint> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let lat = points.iter().map(|p| p.lat).sum::<f64>() / n;
    let lon = points.iter().map(|p| p.lon).sum::<f64>() / n;
    Some(GeoPoint::new(lat, lon))
}

/// Path length in meters on the default sphere
pub fn distance(points: &[GeoPoint]) -> f64 {
    Sphere::default().distance(points)
}

/// Ring area in square meters on the default sphere
pub fn area(points: &[GeoPoint]) -> f64 {
    Sphere::default().area(points)
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Wrap a longitude (or longitude step) in degrees into [-180, 180]
///
/// Keeps edges that cross the antimeridian short.
fn wrap_lon(degrees: f64) -> f64 {
    if degrees > 180.0 {
        degrees - 360.0
    } else if degrees < -180.0 {
        degrees + 360.0
    } else {
        degrees
    }
}
