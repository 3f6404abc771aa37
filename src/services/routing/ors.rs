//! OpenRouteService directions client
//!
//! ORS API documentation:
//! https://openrouteservice.org/dev/#/api-docs/v2/directions
//!
//! Unlike the other backends this one answers GeoJSON, so the path comes
//! as literal coordinate pairs rather than an encoded polyline.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{LiveRoute, RouteProvider, RoutingError};
use crate::types::Coordinates;

/// OpenRouteService routing backend
pub struct OrsProvider {
    client: Client,
    base_url: String,
    api_key: String,
}

impl OrsProvider {
    pub fn new(base_url: &str, api_key: &str, timeout_seconds: u64) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    fn directions_url(&self, start: &Coordinates, end: &Coordinates) -> String {
        // ORS takes lng,lat pairs
        format!(
            "{}/v2/directions/driving-car?api_key={}&start={},{}&end={},{}",
            self.base_url, self.api_key, start.lng, start.lat, end.lng, end.lat
        )
    }
}

#[async_trait]
impl RouteProvider for OrsProvider {
    async fn try_route(
        &self,
        start: &Coordinates,
        end: &Coordinates,
    ) -> Result<LiveRoute, RoutingError> {
        let url = self.directions_url(start, end);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(RoutingError::Http {
                status: response.status().as_u16(),
            });
        }

        let body: DirectionsResponse = response
            .json()
            .await
            .map_err(|_| RoutingError::MalformedResponse("unparseable ORS body"))?;

        parse_response(body)
    }

    fn name(&self) -> &'static str {
        "OpenRouteService"
    }
}

/// Normalize the GeoJSON feature into a [`LiveRoute`]
fn parse_response(body: DirectionsResponse) -> Result<LiveRoute, RoutingError> {
    let feature = body
        .features
        .and_then(|mut features| (!features.is_empty()).then(|| features.remove(0)))
        .ok_or(RoutingError::NoRoute)?;

    let path: Vec<Coordinates> = feature
        .geometry
        .coordinates
        .iter()
        .filter(|pair| pair.len() >= 2)
        .map(|pair| Coordinates::new(pair[1], pair[0])) // GeoJSON is [lng, lat]
        .collect();

    if path.len() < 2 {
        return Err(RoutingError::MissingPolyline);
    }

    let summary = feature.properties.summary;

    Ok(LiveRoute {
        distance_km: summary.distance / 1000.0,
        duration_minutes: summary.duration / 60.0,
        path,
    })
}

// ORS GeoJSON response types

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    features: Option<Vec<Feature>>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    geometry: Geometry,
    properties: Properties,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    /// [lng, lat] pairs
    coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct Properties {
    summary: Summary,
}

#[derive(Debug, Deserialize)]
struct Summary {
    /// Meters
    distance: f64,
    /// Seconds
    duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directions_url_uses_lng_lat_order() {
        let provider = OrsProvider::new("https://api.openrouteservice.org/", "test-key", 5);
        let url = provider.directions_url(
            &Coordinates::new(-12.08, -77.05),
            &Coordinates::new(-12.0464, -77.0428),
        );

        assert!(url.starts_with("https://api.openrouteservice.org/v2/directions/driving-car"));
        assert!(url.contains("start=-77.05,-12.08"));
        assert!(url.contains("end=-77.0428,-12.0464"));
    }

    #[test]
    fn test_parse_response_happy_path() {
        let body: DirectionsResponse = serde_json::from_str(
            r#"{
                "features": [{
                    "geometry": {
                        "coordinates": [[-77.05, -12.08], [-77.047, -12.06], [-77.0428, -12.0464]]
                    },
                    "properties": {
                        "summary": {"distance": 6200.0, "duration": 930.0}
                    }
                }]
            }"#,
        )
        .unwrap();

        let route = parse_response(body).unwrap();
        assert!((route.distance_km - 6.2).abs() < 1e-9);
        assert!((route.duration_minutes - 15.5).abs() < 1e-9);
        assert_eq!(route.path.len(), 3);
        // Normalized back to lat/lng
        assert!((route.path[0].lat - -12.08).abs() < 1e-9);
        assert!((route.path[0].lng - -77.05).abs() < 1e-9);
    }

    #[test]
    fn test_parse_response_no_features() {
        let body: DirectionsResponse = serde_json::from_str(r#"{"features": []}"#).unwrap();
        assert!(matches!(parse_response(body), Err(RoutingError::NoRoute)));
    }

    #[test]
    fn test_parse_response_degenerate_geometry() {
        let body: DirectionsResponse = serde_json::from_str(
            r#"{
                "features": [{
                    "geometry": {"coordinates": [[-77.05, -12.08]]},
                    "properties": {"summary": {"distance": 0.0, "duration": 0.0}}
                }]
            }"#,
        )
        .unwrap();
        assert!(matches!(
            parse_response(body),
            Err(RoutingError::MissingPolyline)
        ));
    }
}
