//! Configuration management

use anyhow::{Context, Result};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NATS server URL
    pub nats_url: String,

    /// Master switch for live routing backends; off means every dispatch
    /// uses synthetic estimation
    pub live_routing: bool,

    /// Google Routes API key (backend skipped when absent)
    pub google_routes_api_key: Option<String>,

    /// OpenRouteService API key (backend skipped when absent)
    pub ors_api_key: Option<String>,

    /// OpenRouteService base URL
    pub ors_url: String,

    /// OSRM base URL (public demo server by default)
    pub osrm_url: String,

    /// Per-call deadline for routing backends, in seconds
    pub routing_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let nats_url = std::env::var("NATS_URL")
            .unwrap_or_else(|_| "nats://localhost:4222".to_string());

        let live_routing = std::env::var("LIVE_ROUTING")
            .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
            .unwrap_or(true);

        let google_routes_api_key = std::env::var("GOOGLE_ROUTES_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());

        let ors_api_key = std::env::var("ORS_API_KEY").ok().filter(|k| !k.is_empty());

        let ors_url = std::env::var("ORS_URL")
            .unwrap_or_else(|_| "https://api.openrouteservice.org".to_string());

        let osrm_url = std::env::var("OSRM_URL")
            .unwrap_or_else(|_| "https://router.project-osrm.org".to_string());

        let routing_timeout_seconds = match std::env::var("ROUTING_TIMEOUT_SECONDS") {
            Ok(v) => v
                .parse::<u64>()
                .context("ROUTING_TIMEOUT_SECONDS must be a whole number of seconds")?,
            Err(_) => 5,
        };

        Ok(Self {
            nats_url,
            live_routing,
            google_routes_api_key,
            ors_api_key,
            ors_url,
            osrm_url,
            routing_timeout_seconds,
        })
    }
}
