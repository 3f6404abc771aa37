//! Traffic and road-distance heuristics
//!
//! Converts straight-line distances into plausible road distances and
//! travel times when no live routing backend answered. The constants
//! approximate driving conditions in metropolitan Lima and are kept in
//! one policy table so they can be tuned without touching the logic.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

use crate::types::Coordinates;

/// Named table of heuristic constants
///
/// Values are calibrated for Lima; other deployments override the table
/// rather than the functions.
#[derive(Debug, Clone)]
pub struct HeuristicPolicy {
    /// Bounding box of the dense historic core (Cercado de Lima)
    pub core_lat_min: f64,
    pub core_lat_max: f64,
    pub core_lng_min: f64,
    pub core_lng_max: f64,

    /// Detour factors: straight-line to road distance
    pub detour_base: f64,
    pub detour_core: f64,
    pub detour_short: f64,
    pub detour_long: f64,
    /// Distance thresholds for the short/long detour bands, in km
    pub detour_short_below_km: f64,
    pub detour_long_above_km: f64,

    /// Speed bands in km/h
    pub speed_core_kmh: f64,
    pub speed_long_kmh: f64,
    pub speed_short_kmh: f64,
    pub speed_default_kmh: f64,
    /// Distance thresholds for the speed bands, in km
    pub speed_long_above_km: f64,
    pub speed_short_below_km: f64,

    /// Time-of-day traffic multipliers
    pub traffic_weekend: f64,
    pub traffic_peak: f64,
    pub traffic_shoulder: f64,
    pub traffic_night: f64,
    pub traffic_default: f64,
}

impl Default for HeuristicPolicy {
    fn default() -> Self {
        Self {
            core_lat_min: -12.065,
            core_lat_max: -12.025,
            core_lng_min: -77.065,
            core_lng_max: -77.015,

            detour_base: 1.3,
            detour_core: 1.5,
            detour_short: 1.2,
            detour_long: 1.25,
            detour_short_below_km: 1.0,
            detour_long_above_km: 15.0,

            speed_core_kmh: 15.0,
            speed_long_kmh: 35.0,
            speed_short_kmh: 20.0,
            speed_default_kmh: 25.0,
            speed_long_above_km: 10.0,
            speed_short_below_km: 2.0,

            traffic_weekend: 1.1,
            traffic_peak: 1.8,
            traffic_shoulder: 1.4,
            traffic_night: 0.9,
            traffic_default: 1.2,
        }
    }
}

/// Is this point inside the dense historic core?
///
/// Single predicate consumed by both the detour factor and the speed
/// bands.
pub fn in_dense_core(point: &Coordinates, policy: &HeuristicPolicy) -> bool {
    point.lat >= policy.core_lat_min
        && point.lat <= policy.core_lat_max
        && point.lng >= policy.core_lng_min
        && point.lng <= policy.core_lng_max
}

/// Time-of-day traffic multiplier applied to base travel time
///
/// Bands, first match wins:
/// - weekend, any hour
/// - weekday peak: 7-8 and 18-20
/// - weekday shoulder: 12-14 and 16-17
/// - weekday late night: 22-23 and 0-6
/// - all other weekday hours
pub fn traffic_multiplier(now: NaiveDateTime, policy: &HeuristicPolicy) -> f64 {
    if matches!(now.weekday(), Weekday::Sat | Weekday::Sun) {
        return policy.traffic_weekend;
    }

    let hour = now.hour();
    if (7..9).contains(&hour) || (18..=20).contains(&hour) {
        policy.traffic_peak
    } else if (12..=14).contains(&hour) || (16..=18).contains(&hour) {
        policy.traffic_shoulder
    } else if hour >= 22 || hour <= 6 {
        policy.traffic_night
    } else {
        policy.traffic_default
    }
}

/// Multiplier converting straight-line distance into estimated road distance
pub fn detour_factor(
    direct_distance_km: f64,
    from: &Coordinates,
    to: &Coordinates,
    policy: &HeuristicPolicy,
) -> f64 {
    if in_dense_core(from, policy) || in_dense_core(to, policy) {
        policy.detour_core
    } else if direct_distance_km < policy.detour_short_below_km {
        policy.detour_short
    } else if direct_distance_km > policy.detour_long_above_km {
        policy.detour_long
    } else {
        policy.detour_base
    }
}

/// Assumed average driving speed for a leg, by zone and distance
pub fn travel_speed_kmh(
    distance_km: f64,
    from: &Coordinates,
    to: &Coordinates,
    policy: &HeuristicPolicy,
) -> f64 {
    if in_dense_core(from, policy) || in_dense_core(to, policy) {
        policy.speed_core_kmh
    } else if distance_km > policy.speed_long_above_km {
        policy.speed_long_kmh
    } else if distance_km < policy.speed_short_below_km {
        policy.speed_short_kmh
    } else {
        policy.speed_default_kmh
    }
}

/// Estimated free-flow travel time in minutes for a road distance
pub fn estimated_travel_time_minutes(
    distance_km: f64,
    from: &Coordinates,
    to: &Coordinates,
    policy: &HeuristicPolicy,
) -> f64 {
    distance_km / travel_speed_kmh(distance_km, from, to, policy) * 60.0
}
