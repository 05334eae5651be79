//! Great-circle distance on a spherical Earth.

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula, in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Both components are finite and within the valid degree ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Distance to `other` in kilometers.
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        distance_km(self.lat, self.lng, other.lat, other.lng)
    }
}

/// Haversine distance between two coordinates, in kilometers.
///
/// Returns `0.0` for identical inputs and is symmetric in its arguments.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let half_lat = (d_lat / 2.0).sin();
    let half_lon = (d_lon / 2.0).sin();

    let a = half_lat * half_lat
        + lat1.to_radians().cos() * lat2.to_radians().cos() * half_lon * half_lon;
    // rounding can push `a` marginally past 1.0 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const MORIOKA: GeoPoint = GeoPoint::new(39.7036, 141.1570);
    const SENDAI: GeoPoint = GeoPoint::new(38.2682, 140.8694);

    #[test]
    fn identical_points_are_zero_apart() {
        assert_eq!(MORIOKA.distance_km(&MORIOKA), 0.0);
        assert_eq!(distance_km(-33.9, 151.2, -33.9, 151.2), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = MORIOKA.distance_km(&SENDAI);
        let ba = SENDAI.distance_km(&MORIOKA);
        assert!((ab - ba).abs() < 1e-9);
    }

    #[test]
    fn known_distance_morioka_to_sendai() {
        let d = MORIOKA.distance_km(&SENDAI);
        assert!((d - 161.0).abs() < 2.0, "unexpected distance {d}");
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = distance_km(0.0, 0.0, 1.0, 0.0);
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert!((d - expected).abs() < 1e-9);
    }

    #[test]
    fn antipodal_points_do_not_produce_nan() {
        let d = distance_km(0.0, 0.0, 0.0, 180.0);
        assert!(d.is_finite());
        assert!((d - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn validity_checks_ranges() {
        assert!(MORIOKA.is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::NAN).is_valid());
    }
}
