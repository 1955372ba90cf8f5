use geo::{HaversineDistance, Point};

use crate::models::GeoPoint;

/// Great-circle distance between two points in kilometers, or `None` when
/// either point falls outside the valid latitude/longitude domain.
///
/// Distance filtering for inclusion is the backend's job; this value is only
/// re-derived locally for display, so an out-of-domain record degrades to an
/// unknown distance instead of propagating NaN.
pub fn distance_km(point1: &GeoPoint, point2: &GeoPoint) -> Option<f64> {
    if !point1.is_valid() || !point2.is_valid() {
        return None;
    }

    let p1 = Point::new(point1.longitude, point1.latitude);
    let p2 = Point::new(point2.longitude, point2.latitude);

    Some(p1.haversine_distance(&p2) / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_to_self_is_zero() {
        for point in [
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(37.7749, -122.4194),
            GeoPoint::new(-90.0, 180.0),
        ] {
            let d = distance_km(&point, &point).expect("valid point");
            assert!(d.abs() < 1e-9, "distance to self was {d}");
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(13.0827, 80.2707);
        let b = GeoPoint::new(28.6139, 77.2090);

        let ab = distance_km(&a, &b).expect("valid");
        let ba = distance_km(&b, &a).expect("valid");
        assert!((ab - ba).abs() / ab < 1e-9);
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        let origin = GeoPoint::new(0.0, 0.0);
        let east = GeoPoint::new(0.0, 1.0);

        let d = distance_km(&origin, &east).expect("valid");
        assert!((d - 111.19).abs() < 0.5, "got {d} km");
    }

    #[test]
    fn test_distance_grows_with_separation_along_bearing() {
        let origin = GeoPoint::new(12.9716, 77.5946);

        let mut previous = 0.0;
        for step in 1..=8 {
            let target = GeoPoint::new(12.9716, 77.5946 + 0.25 * step as f64);
            let d = distance_km(&origin, &target).expect("valid");
            assert!(d > previous, "distance should grow monotonically");
            previous = d;
        }
    }

    #[test]
    fn test_invalid_coordinates_yield_none() {
        let valid = GeoPoint::new(10.0, 10.0);
        let bad_lat = GeoPoint::new(120.0, 10.0);
        let bad_lon = GeoPoint::new(10.0, 200.0);
        let nan = GeoPoint::new(f64::NAN, 10.0);

        assert!(distance_km(&valid, &bad_lat).is_none());
        assert!(distance_km(&bad_lon, &valid).is_none());
        assert!(distance_km(&nan, &valid).is_none());
    }
}
