//! Geodesic distance and projection on the WGS84 ellipsoid.
//!
//! Both directions of the geodesic problem go through `geo::Geodesic`
//! (Karney's algorithm), so `distance` and `destination` agree with each other
//! to well under a millimeter.

use geo::{Bearing, Destination, Distance, Geodesic};

use crate::models::types::Coordinate;

/// Geodesic distance between two coordinates in meters
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    Geodesic.distance(a.to_point(), b.to_point())
}

/// Project `distance_m` meters from `origin` along `bearing_deg`
/// (0 = north, clockwise).
pub fn destination(origin: Coordinate, bearing_deg: f64, distance_m: f64) -> Coordinate {
    let point = Geodesic.destination(origin.to_point(), bearing_deg, distance_m);
    Coordinate::from_projected(point)
}

/// Initial bearing from `a` towards `b` in degrees, `[0, 360)`
pub fn bearing(a: Coordinate, b: Coordinate) -> f64 {
    Geodesic.bearing(a.to_point(), b.to_point()).rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn sample_points() -> Vec<Coordinate> {
        vec![
            coord(0.0, 0.0),
            coord(51.5074, -0.1278),
            coord(-33.8688, 151.2093),
            coord(40.7128, -74.0060),
            coord(89.5, 10.0),
            coord(-89.0, -120.0),
            coord(0.0, 179.99),
            coord(12.0, -179.9),
        ]
    }

    #[test]
    fn test_distance_identical_points_is_zero() {
        for p in sample_points() {
            assert_eq!(distance(p, p), 0.0);
        }
    }

    /// Poles and the antimeridian, each written in more than one form.
    fn edge_points() -> Vec<Coordinate> {
        vec![
            coord(90.0, 0.0),
            coord(90.0, 120.0),
            coord(-90.0, -45.0),
            coord(0.0, 180.0),
            coord(0.0, -180.0),
            coord(45.0, -180.0),
        ]
    }

    #[test]
    fn test_distance_is_symmetric() {
        let points: Vec<_> = sample_points().into_iter().chain(edge_points()).collect();
        for a in &points {
            for b in &points {
                let ab = distance(*a, *b);
                let ba = distance(*b, *a);
                assert!((ab - ba).abs() <= 1e-6 * ab.max(1.0), "{ab} vs {ba}");
                if a != b {
                    assert!(ab > 0.0, "{a:?} and {b:?} differ but are 0m apart");
                } else {
                    assert_eq!(ab, 0.0);
                }
            }
        }
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        // WGS84 gives 111_319.49m; the spherical figure is 111_195m
        let d = distance(coord(0.0, 0.0), coord(0.0, 1.0));
        assert_relative_eq!(d, 111_195.0, max_relative = 0.01);
    }

    #[test]
    fn test_nyc_to_la() {
        let nyc = coord(40.7128, -74.0060);
        let la = coord(34.0522, -118.2437);

        let dist = distance(nyc, la);
        assert!((dist - 3_936_000.0).abs() < 50_000.0); // Within 50km
    }

    #[test]
    fn test_destination_round_trip() {
        let bearings = [0.0, 45.0, 90.0, 135.5, 180.0, 270.0, 359.9];
        let distances = [1.0, 100.0, 150.0, 200.0, 5_000.0, 250_000.0, 1_000_000.0];

        for origin in sample_points() {
            for &b in &bearings {
                for &d in &distances {
                    let dest = destination(origin, b, d);
                    let back = distance(origin, dest);
                    assert_relative_eq!(back, d, max_relative = 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_destination_zero_distance_stays_put() {
        let origin = coord(48.8566, 2.3522);
        let dest = destination(origin, 123.0, 0.0);
        assert!(distance(origin, dest) < 1e-6);
    }

    #[test]
    fn test_destination_north_increases_latitude() {
        let origin = coord(10.0, 20.0);
        let dest = destination(origin, 0.0, 1_000.0);
        assert!(dest.lat() > origin.lat());
        assert_relative_eq!(dest.lng(), origin.lng(), epsilon = 1e-9);
    }

    #[test]
    fn test_destination_across_antimeridian_wraps() {
        let origin = coord(0.0, 179.999);
        let dest = destination(origin, 90.0, 10_000.0);
        assert!(dest.lng() < 0.0);
        assert!((-180.0..=180.0).contains(&dest.lng()));
    }

    #[test]
    fn test_bearing_range() {
        let origin = coord(0.0, 0.0);
        assert_relative_eq!(bearing(origin, coord(-1.0, 0.0)), 180.0, epsilon = 1e-6);
        assert_relative_eq!(bearing(origin, coord(0.0, 1.0)), 90.0, epsilon = 1e-6);
        assert_relative_eq!(bearing(origin, coord(0.0, -1.0)), 270.0, epsilon = 1e-6);
    }
}
