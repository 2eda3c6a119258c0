//! Great-circle math and the formatting helpers used for report fields.

use crate::models::{Origin, Position};

pub const EARTH_RADIUS_MILES: f64 = 3959.0;
pub const METERS_PER_MILE: f64 = 1609.34;

/// A cached report is reused until the user has moved farther than this.
pub const RECALCULATE_THRESHOLD_MILES: f64 = 0.25;

/// Haversine distance in miles between two WGS84 coordinates.
pub fn great_circle_miles(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + lat1.to_radians().cos()
            * lat2.to_radians().cos()
            * (d_lng / 2.0).sin()
            * (d_lng / 2.0).sin();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

/// True when `current` is more than [`RECALCULATE_THRESHOLD_MILES`] from `origin`.
pub fn has_moved_significantly(current: &Position, origin: &Origin) -> bool {
    let moved = great_circle_miles(
        current.latitude,
        current.longitude,
        origin.latitude,
        origin.longitude,
    );
    moved > RECALCULATE_THRESHOLD_MILES
}

/// Renders a value with exactly one decimal place.
pub fn one_decimal(value: f64) -> String {
    format!("{:.1}", value)
}

pub fn meters_to_miles(meters: f64) -> String {
    one_decimal(meters / METERS_PER_MILE)
}

/// Human-readable travel time, e.g. `"12 mins"` or `"1 hr 5 mins"`.
///
/// Missing or zero durations render as `"N/A"`.
pub fn format_duration(seconds: Option<f64>) -> String {
    let seconds = match seconds {
        Some(s) if s != 0.0 => s,
        _ => return "N/A".to_string(),
    };

    let mins = (seconds / 60.0).round() as i64;
    if mins < 60 {
        return format!("{} mins", mins);
    }
    format!("{} hr {} mins", mins / 60, mins % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_is_zero_for_same_point() {
        assert_eq!(great_circle_miles(39.7392, -104.9903, 39.7392, -104.9903), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let pairs = [
            ((39.6789, -104.9811), (39.8333, -104.8000)),
            ((39.7392, -104.9903), (40.0150, -105.2705)),
            ((-33.8688, 151.2093), (51.5074, -0.1278)),
        ];
        for ((lat1, lng1), (lat2, lng2)) in pairs {
            let there = great_circle_miles(lat1, lng1, lat2, lng2);
            let back = great_circle_miles(lat2, lng2, lat1, lng1);
            assert!((there - back).abs() < 1e-9, "{} vs {}", there, back);
        }
    }

    #[test]
    fn test_distance_known_value() {
        // Denver to Boulder is roughly 24 miles as the crow flies.
        let miles = great_circle_miles(39.7392, -104.9903, 40.0150, -105.2705);
        assert!((miles - 24.2).abs() < 0.5, "got {}", miles);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let miles = great_circle_miles(0.0, 0.0, 1.0, 0.0);
        let expected = EARTH_RADIUS_MILES * std::f64::consts::PI / 180.0;
        assert!((miles - expected).abs() < 1e-9);
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Some(0.0)), "N/A");
        assert_eq!(format_duration(None), "N/A");
        assert_eq!(format_duration(Some(59.0)), "1 mins");
        assert_eq!(format_duration(Some(3600.0)), "1 hr 0 mins");
        assert_eq!(format_duration(Some(5400.0)), "1 hr 30 mins");
    }

    #[test]
    fn test_format_duration_rounds_to_hour_boundary() {
        // 59.5 minutes rounds up to a full hour.
        assert_eq!(format_duration(Some(3570.0)), "1 hr 0 mins");
        assert_eq!(format_duration(Some(3540.0)), "59 mins");
    }

    #[test]
    fn test_meters_to_miles() {
        assert_eq!(meters_to_miles(1609.34), "1.0");
        assert_eq!(meters_to_miles(8046.7), "5.0");
        assert_eq!(meters_to_miles(0.0), "0.0");
    }

    #[test]
    fn test_moved_threshold() {
        let origin = Origin {
            latitude: 39.7392,
            longitude: -104.9903,
        };
        let here = Position {
            latitude: 39.7392,
            longitude: -104.9903,
            accuracy_meters: 10.0,
        };
        assert!(!has_moved_significantly(&here, &origin));

        // 0.01 degrees of latitude is about 0.69 miles.
        let far = Position {
            latitude: 39.7492,
            ..here
        };
        assert!(has_moved_significantly(&far, &origin));
    }
}
