//! Google Routes API client
//!
//! Routes API v2 documentation:
//! https://developers.google.com/maps/documentation/routes/compute_route_directions

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{decode_polyline, LiveRoute, RouteProvider, RoutingError};
use crate::types::Coordinates;

const COMPUTE_ROUTES_URL: &str = "https://routes.googleapis.com/directions/v2:computeRoutes";

/// Only the fields the dispatcher consumes; keeps the response small and
/// is required by the API
const FIELD_MASK: &str = "routes.distanceMeters,routes.duration,routes.polyline.encodedPolyline";

/// Google Routes API routing backend
pub struct GoogleRoutesProvider {
    client: Client,
    api_key: String,
}

impl GoogleRoutesProvider {
    pub fn new(api_key: &str, timeout_seconds: u64) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_key: api_key.to_string(),
        }
    }

    fn build_request(start: &Coordinates, end: &Coordinates) -> ComputeRoutesRequest {
        ComputeRoutesRequest {
            origin: Waypoint::at(start),
            destination: Waypoint::at(end),
            travel_mode: "DRIVE".to_string(),
        }
    }
}

#[async_trait]
impl RouteProvider for GoogleRoutesProvider {
    async fn try_route(
        &self,
        start: &Coordinates,
        end: &Coordinates,
    ) -> Result<LiveRoute, RoutingError> {
        let request = Self::build_request(start, end);

        let response = self
            .client
            .post(COMPUTE_ROUTES_URL)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RoutingError::Http {
                status: response.status().as_u16(),
            });
        }

        let body: ComputeRoutesResponse = response
            .json()
            .await
            .map_err(|_| RoutingError::MalformedResponse("unparseable Routes API body"))?;

        parse_response(body)
    }

    fn name(&self) -> &'static str {
        "GoogleRoutes"
    }
}

/// Normalize the Routes API response into a [`LiveRoute`]
fn parse_response(body: ComputeRoutesResponse) -> Result<LiveRoute, RoutingError> {
    let route = body
        .routes
        .and_then(|mut routes| (!routes.is_empty()).then(|| routes.remove(0)))
        .ok_or(RoutingError::NoRoute)?;

    let encoded = route
        .polyline
        .and_then(|p| p.encoded_polyline)
        .ok_or(RoutingError::MissingPolyline)?;

    let path = decode_polyline(&encoded, 5)?;
    if path.len() < 2 {
        return Err(RoutingError::MissingPolyline);
    }

    let duration_seconds = parse_duration_seconds(&route.duration)?;

    Ok(LiveRoute {
        distance_km: route.distance_meters as f64 / 1000.0,
        duration_minutes: duration_seconds / 60.0,
        path,
    })
}

/// Durations arrive as a string like `"1534s"`
fn parse_duration_seconds(duration: &str) -> Result<f64, RoutingError> {
    duration
        .strip_suffix('s')
        .and_then(|v| v.parse::<f64>().ok())
        .ok_or(RoutingError::MalformedResponse("unparseable duration"))
}

// Routes API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ComputeRoutesRequest {
    origin: Waypoint,
    destination: Waypoint,
    travel_mode: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Waypoint {
    location: Location,
}

impl Waypoint {
    fn at(coords: &Coordinates) -> Self {
        Self {
            location: Location {
                lat_lng: LatLng {
                    latitude: coords.lat,
                    longitude: coords.lng,
                },
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Location {
    lat_lng: LatLng,
}

#[derive(Debug, Serialize)]
struct LatLng {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct ComputeRoutesResponse {
    routes: Option<Vec<ApiRoute>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiRoute {
    #[serde(default)]
    distance_meters: u64,
    #[serde(default)]
    duration: String,
    polyline: Option<ApiPolyline>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPolyline {
    encoded_polyline: Option<String>,
}
