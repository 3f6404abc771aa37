//! OSRM routing client
//!
//! OSRM API documentation:
//! https://project-osrm.org/docs/v5.24.0/api/#route-service

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::{decode_polyline, LiveRoute, RouteProvider, RoutingError};
use crate::types::Coordinates;

/// OSRM routing backend (public demo server or self-hosted)
pub struct OsrmProvider {
    client: Client,
    base_url: String,
}

impl OsrmProvider {
    pub fn new(base_url: &str, timeout_seconds: u64) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn route_url(&self, start: &Coordinates, end: &Coordinates) -> String {
        // OSRM takes lng,lat pairs
        format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=polyline",
            self.base_url, start.lng, start.lat, end.lng, end.lat
        )
    }
}

#[async_trait]
impl RouteProvider for OsrmProvider {
    async fn try_route(
        &self,
        start: &Coordinates,
        end: &Coordinates,
    ) -> Result<LiveRoute, RoutingError> {
        let url = self.route_url(start, end);

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(RoutingError::Http {
                status: response.status().as_u16(),
            });
        }

        let body: RouteResponse = response
            .json()
            .await
            .map_err(|_| RoutingError::MalformedResponse("unparseable OSRM body"))?;

        parse_response(body)
    }

    fn name(&self) -> &'static str {
        "Osrm"
    }
}

/// Normalize the OSRM response into a [`LiveRoute`]
fn parse_response(body: RouteResponse) -> Result<LiveRoute, RoutingError> {
    if body.code != "Ok" {
        return Err(RoutingError::NoRoute);
    }

    let route = body
        .routes
        .and_then(|mut routes| (!routes.is_empty()).then(|| routes.remove(0)))
        .ok_or(RoutingError::NoRoute)?;

    let encoded = route.geometry.ok_or(RoutingError::MissingPolyline)?;
    let path = decode_polyline(&encoded, 5)?;
    if path.len() < 2 {
        return Err(RoutingError::MissingPolyline);
    }

    Ok(LiveRoute {
        distance_km: route.distance / 1000.0,
        duration_minutes: route.duration / 60.0,
        path,
    })
}

// OSRM response types

#[derive(Debug, Deserialize)]
struct RouteResponse {
    code: String,
    routes: Option<Vec<OsrmRoute>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters
    distance: f64,
    /// Seconds
    duration: f64,
    /// Encoded polyline, precision 5
    geometry: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_url_shape() {
        let provider = OsrmProvider::new("https://router.project-osrm.org/", 5);
        let url = provider.route_url(
            &Coordinates::new(-12.08, -77.05),
            &Coordinates::new(-12.0464, -77.0428),
        );

        assert_eq!(
            url,
            "https://router.project-osrm.org/route/v1/driving/-77.05,-12.08;-77.0428,-12.0464?overview=full&geometries=polyline"
        );
    }

    #[test]
    fn test_parse_response_happy_path() {
        let body: RouteResponse = serde_json::from_str(
            r#"{
                "code": "Ok",
                "routes": [{
                    "distance": 5100.0,
                    "duration": 660.0,
                    "geometry": "_p~iF~ps|U_ulLnnqC"
                }]
            }"#,
        )
        .unwrap();

        let route = parse_response(body).unwrap();
        assert!((route.distance_km - 5.1).abs() < 1e-9);
        assert!((route.duration_minutes - 11.0).abs() < 1e-9);
        assert_eq!(route.path.len(), 2);
    }

    #[test]
    fn test_parse_response_error_code() {
        let body: RouteResponse =
            serde_json::from_str(r#"{"code": "NoRoute", "routes": []}"#).unwrap();
        assert!(matches!(parse_response(body), Err(RoutingError::NoRoute)));
    }

    #[test]
    fn test_parse_response_missing_geometry() {
        let body: RouteResponse = serde_json::from_str(
            r#"{"code": "Ok", "routes": [{"distance": 100.0, "duration": 30.0}]}"#,
        )
        .unwrap();
        assert!(matches!(
            parse_response(body),
            Err(RoutingError::MissingPolyline)
        ));
    }
}
