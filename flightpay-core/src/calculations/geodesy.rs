//! Great-circle distance and route interpolation.
//!
//! Distances use the haversine formula on a spherical Earth; routes are
//! approximated as straight lines in (latitude, longitude) space, sampled
//! at evenly spaced longitudes.

use thiserror::Error;

use crate::models::Coordinate;

/// Mean Earth radius in statute miles, matching the constant used by the
/// upstream flight-schedule tooling.
pub const EARTH_RADIUS_MILES: f64 = 3958.761;

/// Errors raised by route interpolation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeodesyError {
    #[error("Waypoint count must be at least 2, got {0}")]
    TooFewWaypoints(usize),
}

/// Computes the great-circle distance between two coordinates in statute
/// miles using the haversine formula.
///
/// The intermediate haversine term is clamped to `[0.0, 1.0]` so that
/// floating-point drift on near-antipodal or identical points can never
/// produce a NaN from `sqrt`.
pub fn distance(p1: Coordinate, p2: Coordinate) -> f64 {
    let d_lat = (p2.lat - p1.lat).to_radians();
    let d_lon = (p2.lon - p1.lon).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + p1.lat.to_radians().cos() * p2.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Produces `count` coordinates along the straight segment from `p1` to
/// `p2`, endpoints included.
///
/// Interior points are spaced evenly by longitude, with latitude read off
/// the connecting line. When both endpoints share a longitude (a due
/// north-south leg) the latitude is stepped evenly instead, since the line
/// has no longitude extent to divide.
///
/// The endpoints are emitted exactly as given rather than recomputed, so
/// `result[0] == p1` and `result[count - 1] == p2` hold without
/// floating-point caveats.
pub fn interpolate(
    p1: Coordinate,
    p2: Coordinate,
    count: usize,
) -> Result<Vec<Coordinate>, GeodesyError> {
    if count < 2 {
        return Err(GeodesyError::TooFewWaypoints(count));
    }

    let mut points = Vec::with_capacity(count);
    points.push(p1);

    let steps = (count - 1) as f64;
    if p1.lon == p2.lon {
        let lat_step = (p2.lat - p1.lat) / steps;
        for i in 1..count - 1 {
            let lat = p1.lat + lat_step * i as f64;
            points.push(Coordinate::new(lat, p1.lon));
        }
    } else {
        let slope = (p2.lat - p1.lat) / (p2.lon - p1.lon);
        let lon_step = (p2.lon - p1.lon) / steps;
        for i in 1..count - 1 {
            let lon = p1.lon + lon_step * i as f64;
            let lat = p1.lat + slope * (lon - p1.lon);
            points.push(Coordinate::new(lat, lon));
        }
    }

    points.push(p2);
    Ok(points)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    // =========================================================================
    // distance tests
    // =========================================================================

    #[test]
    fn distance_to_self_is_zero() {
        let atl = Coordinate::new(33.64, -84.43);

        let result = distance(atl, atl);

        assert_close(result, 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let atl = Coordinate::new(33.64, -84.43);
        let jfk = Coordinate::new(40.64, -73.78);

        let forward = distance(atl, jfk);
        let backward = distance(jfk, atl);

        assert_close(forward, backward);
    }

    #[test]
    fn distance_atlanta_to_new_york_is_about_760_miles() {
        let atl = Coordinate::new(33.64, -84.43);
        let jfk = Coordinate::new(40.64, -73.78);

        let result = distance(atl, jfk);

        assert!(
            (result - 760.0).abs() < 10.0,
            "expected roughly 760 miles, got {result}"
        );
    }

    #[test]
    fn distance_one_degree_of_longitude_at_equator() {
        let west = Coordinate::new(0.0, 0.0);
        let east = Coordinate::new(0.0, 1.0);

        let result = distance(west, east);

        // One degree of arc is R * pi / 180.
        assert_close(result, EARTH_RADIUS_MILES * std::f64::consts::PI / 180.0);
    }

    #[test]
    fn distance_never_returns_nan_for_antipodal_points() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);

        let result = distance(a, b);

        assert!(result.is_finite());
        assert_close(result, EARTH_RADIUS_MILES * std::f64::consts::PI);
    }

    // =========================================================================
    // interpolate tests
    // =========================================================================

    #[test]
    fn interpolate_rejects_count_below_two() {
        let a = Coordinate::new(30.0, -90.0);
        let b = Coordinate::new(40.0, -80.0);

        let result = interpolate(a, b, 1);

        assert_eq!(result, Err(GeodesyError::TooFewWaypoints(1)));
    }

    #[test]
    fn interpolate_with_count_two_returns_only_endpoints() {
        let a = Coordinate::new(30.0, -90.0);
        let b = Coordinate::new(40.0, -80.0);

        let result = interpolate(a, b, 2).unwrap();

        assert_eq!(result, vec![a, b]);
    }

    #[test]
    fn interpolate_returns_exactly_count_points() {
        let a = Coordinate::new(33.64, -84.43);
        let b = Coordinate::new(40.64, -73.78);

        let result = interpolate(a, b, 30).unwrap();

        assert_eq!(result.len(), 30);
    }

    #[test]
    fn interpolate_first_and_last_match_endpoints_exactly() {
        let a = Coordinate::new(33.64, -84.43);
        let b = Coordinate::new(40.64, -73.78);

        let result = interpolate(a, b, 7).unwrap();

        assert_eq!(result[0], a);
        assert_eq!(result[6], b);
    }

    #[test]
    fn interpolate_north_south_leg_steps_latitude() {
        let south = Coordinate::new(30.0, -90.0);
        let north = Coordinate::new(40.0, -90.0);

        let result = interpolate(south, north, 5).unwrap();

        let expected_lats = [30.0, 32.5, 35.0, 37.5, 40.0];
        for (point, expected_lat) in result.iter().zip(expected_lats) {
            assert_close(point.lat, expected_lat);
            assert_close(point.lon, -90.0);
        }
    }

    #[test]
    fn interpolate_diagonal_leg_spaces_longitude_evenly() {
        let a = Coordinate::new(30.0, -90.0);
        let b = Coordinate::new(40.0, -80.0);

        let result = interpolate(a, b, 5).unwrap();

        let expected = [
            (30.0, -90.0),
            (32.5, -87.5),
            (35.0, -85.0),
            (37.5, -82.5),
            (40.0, -80.0),
        ];
        for (point, (lat, lon)) in result.iter().zip(expected) {
            assert_close(point.lat, lat);
            assert_close(point.lon, lon);
        }
    }

    #[test]
    fn interpolate_westbound_leg_descends_longitude() {
        let east = Coordinate::new(40.0, -80.0);
        let west = Coordinate::new(30.0, -90.0);

        let result = interpolate(east, west, 3).unwrap();

        assert_close(result[1].lat, 35.0);
        assert_close(result[1].lon, -85.0);
    }
}
