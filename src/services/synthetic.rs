//! Synthetic route generator
//!
//! Produces a plausible-looking polyline between two points when no live
//! routing backend is reachable. The output is for map display only - it
//! approximates how a drive would hug the nearest arterial road (or an
//! urban grid), it is not street-accurate.

use crate::services::geo::haversine_distance;
use crate::types::Coordinates;

/// Orientation of an arterial road anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoadOrientation {
    NorthSouth,
    EastWest,
    Highway,
}

/// A reference point on a major Lima arterial
#[derive(Debug, Clone, Copy)]
pub struct RoadAnchor {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
    pub orientation: RoadOrientation,
}

/// Fixed table of arterial reference points used for path snapping
pub static ROAD_ANCHORS: [RoadAnchor; 13] = [
    RoadAnchor { name: "Av. Arequipa", lat: -12.0850, lng: -77.0350, orientation: RoadOrientation::NorthSouth },
    RoadAnchor { name: "Vía Expresa Paseo de la República", lat: -12.0980, lng: -77.0280, orientation: RoadOrientation::Highway },
    RoadAnchor { name: "Av. Javier Prado", lat: -12.0908, lng: -77.0090, orientation: RoadOrientation::EastWest },
    RoadAnchor { name: "Av. Brasil", lat: -12.0750, lng: -77.0600, orientation: RoadOrientation::NorthSouth },
    RoadAnchor { name: "Av. Universitaria", lat: -12.0600, lng: -77.0800, orientation: RoadOrientation::NorthSouth },
    RoadAnchor { name: "Av. Óscar Benavides (Colonial)", lat: -12.0500, lng: -77.0900, orientation: RoadOrientation::EastWest },
    RoadAnchor { name: "Av. Argentina", lat: -12.0450, lng: -77.1000, orientation: RoadOrientation::EastWest },
    RoadAnchor { name: "Panamericana Norte", lat: -11.9950, lng: -77.0600, orientation: RoadOrientation::Highway },
    RoadAnchor { name: "Panamericana Sur", lat: -12.1500, lng: -76.9800, orientation: RoadOrientation::Highway },
    RoadAnchor { name: "Av. Túpac Amaru", lat: -11.9900, lng: -77.0500, orientation: RoadOrientation::NorthSouth },
    RoadAnchor { name: "Av. La Marina", lat: -12.0770, lng: -77.0900, orientation: RoadOrientation::EastWest },
    RoadAnchor { name: "Av. Angamos", lat: -12.1110, lng: -77.0200, orientation: RoadOrientation::EastWest },
    RoadAnchor { name: "Carretera Central", lat: -12.0300, lng: -76.9300, orientation: RoadOrientation::Highway },
];

/// A route midpoint must be this close to an anchor for road-based snapping
const ANCHOR_SNAP_RADIUS_KM: f64 = 5.0;

/// Below this direct distance a 3-point jittered path is enough
const SHORT_ROUTE_KM: f64 = 0.5;

/// Perpendicular midpoint offset for short routes, in degrees
const MIDPOINT_JITTER_DEG: f64 = 0.0008;

/// How far mid-path points are pulled toward the anchor's axis
const AXIS_PULL: f64 = 0.5;

/// Synthesize a display polyline from `start` to `end`
///
/// Always returns at least 3 points; the first equals `start` and the
/// last equals `end`. Deterministic, no I/O.
pub fn synthesize_route(start: &Coordinates, end: &Coordinates, direct_km: f64) -> Vec<Coordinates> {
    if direct_km < SHORT_ROUTE_KM {
        return short_route(start, end);
    }

    let midpoint = lerp(start, end, 0.5);
    match nearest_anchor(&midpoint) {
        Some((anchor, distance_km)) if distance_km <= ANCHOR_SNAP_RADIUS_KM => {
            road_based_route(start, end, anchor)
        }
        _ => grid_route(start, end),
    }
}

/// Nearest arterial anchor to a point, with its distance
pub fn nearest_anchor(point: &Coordinates) -> Option<(&'static RoadAnchor, f64)> {
    ROAD_ANCHORS
        .iter()
        .map(|anchor| {
            let at = Coordinates::new(anchor.lat, anchor.lng);
            (anchor, haversine_distance(point, &at))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/// 3-point path with a fixed perpendicular offset at the midpoint, so a
/// sub-500m route does not render as a single straight segment
fn short_route(start: &Coordinates, end: &Coordinates) -> Vec<Coordinates> {
    let mut mid = lerp(start, end, 0.5);

    let d_lat = end.lat - start.lat;
    let d_lng = end.lng - start.lng;
    let norm = (d_lat * d_lat + d_lng * d_lng).sqrt();
    if norm > f64::EPSILON {
        mid.lat += -d_lng / norm * MIDPOINT_JITTER_DEG;
        mid.lng += d_lat / norm * MIDPOINT_JITTER_DEG;
    } else {
        mid.lat += MIDPOINT_JITTER_DEG;
    }

    vec![*start, mid, *end]
}

/// 6-point path bending toward `anchor` and running parallel to its
/// orientation for the middle 50% of the journey
fn road_based_route(start: &Coordinates, end: &Coordinates, anchor: &RoadAnchor) -> Vec<Coordinates> {
    let pull = |point: Coordinates| -> Coordinates {
        let mut pulled = point;
        match anchor.orientation {
            // North-south roads hold a longitude; pull lng toward the road
            RoadOrientation::NorthSouth => {
                pulled.lng += (anchor.lng - point.lng) * AXIS_PULL;
            }
            // East-west roads hold a latitude
            RoadOrientation::EastWest => {
                pulled.lat += (anchor.lat - point.lat) * AXIS_PULL;
            }
            // Highways cut diagonally; pull both components half as hard
            RoadOrientation::Highway => {
                pulled.lat += (anchor.lat - point.lat) * AXIS_PULL / 2.0;
                pulled.lng += (anchor.lng - point.lng) * AXIS_PULL / 2.0;
            }
        }
        pulled
    };

    vec![
        *start,
        pull(lerp(start, end, 0.25)),
        pull(lerp(start, end, 0.5)),
        pull(lerp(start, end, 0.75)),
        lerp(start, end, 0.9),
        *end,
    ]
}

/// 6-point L-shaped path: the axis with the larger delta first, then the
/// other, approximating an urban grid
fn grid_route(start: &Coordinates, end: &Coordinates) -> Vec<Coordinates> {
    let d_lat = end.lat - start.lat;
    let d_lng = end.lng - start.lng;

    let corner = if d_lat.abs() >= d_lng.abs() {
        Coordinates::new(end.lat, start.lng)
    } else {
        Coordinates::new(start.lat, end.lng)
    };

    vec![
        *start,
        lerp(start, &corner, 1.0 / 3.0),
        lerp(start, &corner, 2.0 / 3.0),
        corner,
        lerp(&corner, end, 0.5),
        *end,
    ]
}

fn lerp(from: &Coordinates, to: &Coordinates, t: f64) -> Coordinates {
    Coordinates::new(
        from.lat + (to.lat - from.lat) * t,
        from.lng + (to.lng - from.lng) * t,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: &Coordinates, b: &Coordinates) -> bool {
        (a.lat - b.lat).abs() < 1e-9 && (a.lng - b.lng).abs() < 1e-9
    }

    #[test]
    fn test_endpoints_always_preserved() {
        let cases = [
            (Coordinates::new(-12.08, -77.05), Coordinates::new(-12.0464, -77.0428), 4.0),
            (Coordinates::new(-12.30, -76.80), Coordinates::new(-12.31, -76.81), 1.6),
            (Coordinates::new(-12.05, -77.04), Coordinates::new(-12.051, -77.041), 0.15),
        ];

        for (start, end, km) in cases {
            let path = synthesize_route(&start, &end, km);
            assert!(path.len() >= 3, "got {} points", path.len());
            assert!(close(&path[0], &start));
            assert!(close(path.last().unwrap(), &end));
        }
    }

    #[test]
    fn test_short_route_is_three_points_with_bend() {
        let start = Coordinates::new(-12.05, -77.04);
        let end = Coordinates::new(-12.052, -77.041);

        let path = synthesize_route(&start, &end, 0.3);
        assert_eq!(path.len(), 3);

        // Midpoint must sit off the straight segment
        let straight_mid = Coordinates::new(
            (start.lat + end.lat) / 2.0,
            (start.lng + end.lng) / 2.0,
        );
        assert!(!close(&path[1], &straight_mid));
    }

    #[test]
    fn test_identical_endpoints_do_not_panic() {
        let point = Coordinates::new(-12.05, -77.04);
        let path = synthesize_route(&point, &point, 0.0);
        assert_eq!(path.len(), 3);
        assert!(close(&path[0], &point));
        assert!(close(&path[2], &point));
    }

    #[test]
    fn test_route_near_arterial_has_six_points() {
        // Miraflores to downtown: midpoint lands well within 5 km of
        // Av. Arequipa
        let start = Coordinates::new(-12.12, -77.03);
        let end = Coordinates::new(-12.0464, -77.0428);

        let path = synthesize_route(&start, &end, 8.0);
        assert_eq!(path.len(), 6);
    }

    #[test]
    fn test_route_far_from_anchors_uses_grid_path() {
        // Out in the desert south of the city, no anchor within 5 km
        let start = Coordinates::new(-12.60, -76.70);
        let end = Coordinates::new(-12.70, -76.65);

        let path = synthesize_route(&start, &end, 12.0);
        assert_eq!(path.len(), 6);

        // Grid path: lat delta dominates, so the corner holds start's lng
        let corner = path[3];
        assert!((corner.lat - end.lat).abs() < 1e-9);
        assert!((corner.lng - start.lng).abs() < 1e-9);
    }

    #[test]
    fn test_grid_path_lng_dominant_axis() {
        let start = Coordinates::new(-12.60, -76.90);
        let end = Coordinates::new(-12.61, -76.60);

        let path = synthesize_route(&start, &end, 30.0);
        let corner = path[3];
        assert!((corner.lat - start.lat).abs() < 1e-9);
        assert!((corner.lng - end.lng).abs() < 1e-9);
    }

    #[test]
    fn test_deterministic() {
        let start = Coordinates::new(-12.12, -77.03);
        let end = Coordinates::new(-12.0464, -77.0428);

        let first = synthesize_route(&start, &end, 8.0);
        let second = synthesize_route(&start, &end, 8.0);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert!(close(a, b));
        }
    }

    #[test]
    fn test_nearest_anchor_downtown_is_close() {
        let downtown = Coordinates::new(-12.0464, -77.0428);
        let (_, distance) = nearest_anchor(&downtown).unwrap();
        assert!(distance < 5.0, "got {} km", distance);
    }

    #[test]
    fn test_anchor_table_size() {
        assert_eq!(ROAD_ANCHORS.len(), 13);
    }
}
