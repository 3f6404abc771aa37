//! Route computation types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::crew::CrewCategory;

/// Coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Usable for routing only inside the WGS84 ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Where a route's distance/time/path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteSource {
    /// Reported by a live routing backend
    LiveApi,
    /// Estimated locally (haversine + heuristics + synthetic path)
    Synthetic,
}

/// One computed crew-to-incident route
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub crew_id: Uuid,
    pub crew_code: String,
    pub crew_name: String,
    /// Road (or estimated road) distance in kilometers
    pub distance_km: f64,
    /// Free-flow travel time in minutes
    pub travel_time_minutes: f64,
    /// Travel time with the time-of-day traffic multiplier applied
    pub travel_time_with_traffic_minutes: f64,
    /// Ordered polyline from crew to incident, at least two points
    pub path: Vec<Coordinates>,
    pub source: RouteSource,
}

/// Best route within one crew category, with its rendering color
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRouteResult {
    pub category: CrewCategory,
    /// Hex color the dashboard draws this category's route with
    pub color: String,
    pub route: RouteResult,
}
